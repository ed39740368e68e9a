//! Import Resolution
//!
//! Loads a contract together with the modules and interfaces it imports so
//! that calls and `staticcall` targets can be followed across files.
//!
//! Relative imports (`from . import ownable`) resolve against the importing
//! file's directory; absolute imports are tried against that directory first
//! and then against each configured search path. Imports that cannot be found
//! or parsed are kept as [`ImportTarget::Unresolved`] rather than failing the
//! importing file.

pub mod ercs;

use crate::Result;
use crate::ast::{self, InterfaceDef, Module, Mutability, VariableKind, Visibility};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

pub use ercs::builtin_interface;

/// What an import alias refers to
#[derive(Debug, Clone)]
pub enum ImportTarget {
    /// A `.vy` module or `.vyi` interface file
    Module(Arc<SourceUnit>),
    /// A built-in interface such as `ethereum.ercs.IERC20`
    Interface(InterfaceDef),
    Unresolved,
}

/// A parsed file with its resolved imports
#[derive(Debug)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub module: Module,
    pub imports: BTreeMap<String, ImportTarget>,
}

impl SourceUnit {
    /// Parsed module behind an import alias
    pub fn imported_unit(&self, alias: &str) -> Option<&Arc<SourceUnit>> {
        match self.imports.get(alias) {
            Some(ImportTarget::Module(unit)) => Some(unit),
            _ => None,
        }
    }

    /// True if `name` names an interface type visible in this unit
    pub fn is_interface(&self, name: &str) -> bool {
        self.module.interface(name).is_some()
            || matches!(
                self.imports.get(name),
                Some(ImportTarget::Interface(_) | ImportTarget::Module(_))
            )
    }

    /// Declared mutability of `function` on interface `interface`
    ///
    /// Interfaces can be inline `interface` blocks, built-ins, or imported
    /// modules used as interface types (their external functions and public
    /// getters form the interface).
    pub fn interface_function_mutability(
        &self,
        interface: &str,
        function: &str,
    ) -> Option<Mutability> {
        if let Some(def) = self.module.interface(interface) {
            return def.mutability_of(function);
        }
        match self.imports.get(interface)? {
            ImportTarget::Interface(def) => def.mutability_of(function),
            ImportTarget::Module(unit) => unit.external_mutability(function),
            ImportTarget::Unresolved => None,
        }
    }

    /// Mutability of an externally callable function or getter of this unit
    pub fn external_mutability(&self, function: &str) -> Option<Mutability> {
        if let Some(def) = self.module.function(function) {
            return (def.visibility() == Visibility::External).then_some(def.mutability());
        }
        self.module
            .variable(function)
            .filter(|v| v.is_public)
            .map(|v| match v.kind {
                VariableKind::Constant => Mutability::Pure,
                _ => Mutability::View,
            })
    }
}

/// Loads and caches source units
pub struct ModuleLoader {
    search_paths: Vec<PathBuf>,
    cache: HashMap<PathBuf, Arc<SourceUnit>>,
    loading: HashSet<PathBuf>,
}

impl ModuleLoader {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths,
            cache: HashMap::new(),
            loading: HashSet::new(),
        }
    }

    /// Load a file from disk; parse errors in the file itself are returned
    pub fn load(&mut self, path: &Path) -> Result<Arc<SourceUnit>> {
        let key = canonical(path);
        if let Some(unit) = self.cache.get(&key) {
            return Ok(Arc::clone(unit));
        }
        let source = std::fs::read_to_string(path)?;
        self.load_source(path, &source)
    }

    /// Parse `source` as if it were the content of `path`
    pub fn load_source(&mut self, path: &Path, source: &str) -> Result<Arc<SourceUnit>> {
        let key = canonical(path);
        let module = ast::parse_source(path, source)?;

        self.loading.insert(key.clone());
        let dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let imports = self.resolve_imports(&dir, &module);
        self.loading.remove(&key);

        let unit = Arc::new(SourceUnit {
            path: path.to_path_buf(),
            module,
            imports,
        });
        self.cache.insert(key, Arc::clone(&unit));
        Ok(unit)
    }

    fn resolve_imports(&mut self, dir: &Path, module: &Module) -> BTreeMap<String, ImportTarget> {
        let mut imports = BTreeMap::new();
        for import in &module.imports {
            let target = self.resolve_import(dir, &import.path);
            if matches!(target, ImportTarget::Unresolved) {
                debug!(module = %module.name, import = %import.path, "Import not resolved");
            }
            imports.insert(import.alias.clone(), target);
        }
        imports
    }

    fn resolve_import(&mut self, dir: &Path, import_path: &str) -> ImportTarget {
        if let Some(def) = builtin_interface(import_path) {
            return ImportTarget::Interface(def);
        }
        let Some(file) = self.locate(dir, import_path) else {
            return ImportTarget::Unresolved;
        };
        if self.loading.contains(&canonical(&file)) {
            warn!(path = %file.display(), "Import cycle detected");
            return ImportTarget::Unresolved;
        }
        match self.load(&file) {
            Ok(unit) => ImportTarget::Module(unit),
            Err(err) => {
                warn!(path = %file.display(), error = %err, "Failed to load imported module");
                ImportTarget::Unresolved
            }
        }
    }

    /// Find the file an import path refers to
    pub fn locate(&self, dir: &Path, import_path: &str) -> Option<PathBuf> {
        let dots = import_path.chars().take_while(|c| *c == '.').count();
        let relative: PathBuf = import_path[dots..].split('.').collect();

        let roots: Vec<PathBuf> = if dots > 0 {
            let mut base = dir.to_path_buf();
            for _ in 1..dots {
                base = base.parent()?.to_path_buf();
            }
            vec![base]
        } else {
            std::iter::once(dir.to_path_buf())
                .chain(self.search_paths.iter().cloned())
                .collect()
        };

        roots.into_iter().find_map(|root| {
            ["vy", ast::INTERFACE_EXTENSION]
                .iter()
                .map(|ext| root.join(&relative).with_extension(ext))
                .find(|candidate| candidate.is_file())
        })
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_relative_and_builtin_imports_resolve() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("ownable.vy"),
            "owner: public(address)\n\n@external\ndef transfer_ownership(new_owner: address):\n    self.owner = new_owner\n",
        )
        .unwrap();
        let main = temp.path().join("main.vy");
        fs::write(
            &main,
            "from ethereum.ercs import IERC20\nfrom . import ownable\nimport missing\n",
        )
        .unwrap();

        let mut loader = ModuleLoader::new(Vec::new());
        let unit = loader.load(&main).unwrap();
        assert!(matches!(unit.imports["IERC20"], ImportTarget::Interface(_)));
        assert!(unit.imported_unit("ownable").is_some());
        assert!(matches!(unit.imports["missing"], ImportTarget::Unresolved));
        assert_eq!(
            unit.interface_function_mutability("ownable", "owner"),
            Some(Mutability::View)
        );
    }

    #[test]
    fn test_search_paths_are_consulted() {
        let temp = TempDir::new().unwrap();
        let lib = temp.path().join("lib").join("interfaces");
        fs::create_dir_all(&lib).unwrap();
        fs::write(
            lib.join("IOracle.vyi"),
            "@external\n@view\ndef price() -> uint256:\n    ...\n",
        )
        .unwrap();
        let contracts = temp.path().join("contracts");
        fs::create_dir_all(&contracts).unwrap();
        let main = contracts.join("main.vy");
        fs::write(&main, "import interfaces.IOracle as IOracle\n").unwrap();

        let mut loader = ModuleLoader::new(vec![temp.path().join("lib")]);
        let unit = loader.load(&main).unwrap();
        assert!(unit.is_interface("IOracle"));
        assert_eq!(
            unit.interface_function_mutability("IOracle", "price"),
            Some(Mutability::View)
        );
    }

    #[test]
    fn test_broken_import_does_not_fail_importer() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("broken.vy"), "def (:\n").unwrap();
        let main = temp.path().join("main.vy");
        fs::write(&main, "from . import broken\n").unwrap();

        let mut loader = ModuleLoader::new(Vec::new());
        let unit = loader.load(&main).unwrap();
        assert!(matches!(unit.imports["broken"], ImportTarget::Unresolved));
    }
}
