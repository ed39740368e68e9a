//! `exports:` declaration generation

use super::load_unit;
use crate::Result;
use crate::ast::Visibility;
use crate::resolver::SourceUnit;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const INTERFACE_MEMBER: &str = "__interface__";

/// Generate an explicit `exports:` declaration for the contract at `path`
///
/// Lists every externally callable name (external functions, public getters
/// and re-exported module functions) once, sorted, qualified with the file
/// stem. With `include_module_comments`, names that come from an imported
/// module are annotated with that module's name.
pub fn generate_exports(
    path: &Path,
    extra_paths: &[PathBuf],
    include_module_comments: bool,
) -> Result<String> {
    let unit = load_unit(path, extra_paths)?;
    Ok(render(&unit, include_module_comments))
}

fn render(unit: &SourceUnit, include_module_comments: bool) -> String {
    let module_name = &unit.module.name;
    let surface = external_surface(unit);
    if surface.is_empty() {
        return format!("# No external functions found in {module_name}");
    }

    let last = surface.len() - 1;
    let lines: Vec<String> = surface
        .iter()
        .enumerate()
        .map(|(i, (name, origin))| {
            let mut line = format!("    {module_name}.{name}");
            if i < last {
                line.push(',');
            }
            if let (true, Some(origin)) = (include_module_comments, origin) {
                line.push_str("  # ");
                line.push_str(origin);
            }
            line
        })
        .collect();

    format!(
        "# NOTE: Always double-check the generated exports\nexports: (\n{}\n)",
        lines.join("\n")
    )
}

/// Externally callable names, mapped to the module they come from (`None`
/// for the contract itself)
fn external_surface(unit: &SourceUnit) -> BTreeMap<String, Option<String>> {
    let mut surface = BTreeMap::new();
    for name in own_surface(unit) {
        surface.insert(name, None);
    }

    for export in &unit.module.exports {
        let Some((alias, member)) = export.as_qualified_name() else {
            debug!(span = %export.span, "Skipping unsupported export entry");
            continue;
        };
        let Some(imported) = unit.imported_unit(alias) else {
            debug!(module = alias, "Export from unresolved module");
            continue;
        };
        let origin = Some(imported.module.name.clone());
        if member == INTERFACE_MEMBER {
            for name in own_surface(imported) {
                surface.entry(name).or_insert_with(|| origin.clone());
            }
        } else if imported.external_mutability(member).is_some() {
            surface.entry(member.to_string()).or_insert(origin);
        }
    }
    surface
}

/// External functions and public getters declared by the unit itself
fn own_surface(unit: &SourceUnit) -> Vec<String> {
    let functions = unit
        .module
        .functions
        .iter()
        .filter(|f| f.visibility() == Visibility::External)
        .map(|f| f.name.clone());
    let getters = unit
        .module
        .variables
        .iter()
        .filter(|v| v.is_public)
        .map(|v| v.name.clone());
    functions.chain(getters).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_exports_are_sorted_and_qualified() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vault.vy");
        fs::write(
            &path,
            "total: public(uint256)\n\n@external\ndef withdraw():\n    pass\n\n@internal\ndef _helper():\n    pass\n\n@external\n@view\ndef balance() -> uint256:\n    return 0\n",
        )
        .unwrap();

        let output = generate_exports(&path, &[], false).unwrap();
        assert_eq!(
            output,
            "# NOTE: Always double-check the generated exports\nexports: (\n    vault.balance,\n    vault.total,\n    vault.withdraw\n)"
        );
    }

    #[test]
    fn test_no_external_functions() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("library.vy");
        fs::write(&path, "@internal\ndef _helper():\n    pass\n").unwrap();

        let output = generate_exports(&path, &[], false).unwrap();
        assert_eq!(output, "# No external functions found in library");
    }
}
