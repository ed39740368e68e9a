//! Directory linting, exclusions and import resolution across files

use crate::test_utils::{fixture, issues_for, write_contract};
use natrix_lint::{Linter, NatrixConfig, NatrixError};
use tempfile::TempDir;

#[test]
fn test_directory_lint_over_fixtures() {
    let linter = Linter::new(NatrixConfig::default());
    let report = linter.lint_paths(&[fixture("")]).unwrap();

    assert_eq!(report.files_checked, 5);
    let located: Vec<String> = report
        .issues
        .iter()
        .map(|i| {
            let name = i.file.file_name().unwrap().to_string_lossy().to_string();
            format!("{name}:{} {}", i.line, i.code)
        })
        .collect();
    assert_eq!(
        located,
        vec![
            "ownable.vy:11 NTX4",
            "staticcall_pure.vy:8 NTX5",
            "staticcall_pure.vy:14 NTX5",
            "staticcall_view.vy:19 NTX4",
        ]
    );
}

#[test]
fn test_excluded_directory_is_skipped() {
    let config = NatrixConfig::default().with_exclude_pattern("**/oracle");
    let report = Linter::new(config).lint_paths(&[fixture("")]).unwrap();
    assert_eq!(report.files_checked, 3);
}

#[test]
fn test_module_call_effects_cross_files() {
    let temp = TempDir::new().unwrap();
    write_contract(
        &temp,
        "lib/counter.vy",
        "count: uint256\n\n@internal\ndef bump():\n    self.count += 1\n\n@internal\n@pure\ndef twice(x: uint256) -> uint256:\n    return x * 2\n",
    );
    let main = write_contract(
        &temp,
        "contracts/main.vy",
        "import counter\n\ninitializes: counter\n\n@external\n@view\ndef poke():\n    counter.bump()\n\n@external\ndef double(x: uint256) -> uint256:\n    return counter.twice(x)\n",
    );

    let config = NatrixConfig::default().with_extra_path(temp.path().join("lib"));
    let report = Linter::new(config).lint_file(&main).unwrap();
    assert_eq!(issues_for(&report, "poke"), vec![("NTX6".to_string(), 5)]);
    assert_eq!(issues_for(&report, "double"), vec![("NTX5".to_string(), 10)]);
}

#[test]
fn test_unresolved_module_call_is_not_inferred() {
    let report = crate::test_utils::lint_source(
        "import missing\n\n@external\ndef call_it() -> uint256:\n    return missing.compute()\n",
    );
    assert!(!report.has_issues());
}

#[test]
fn test_missing_path_is_an_error() {
    let result = Linter::new(NatrixConfig::default())
        .lint_paths(&[std::path::PathBuf::from("/nonexistent/contracts")]);
    assert!(matches!(result, Err(NatrixError::Io(_))));
}
