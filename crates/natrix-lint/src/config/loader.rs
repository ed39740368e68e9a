//! Configuration loader
//!
//! Merges configuration sources with Figment. Later sources override
//! earlier ones:
//! 1. Default values from `NatrixConfig::default()`
//! 2. `natrix.toml` in the project directory
//! 3. `[tool.natrix]` in `pyproject.toml` in the project directory
//! 4. Environment variables (`NATRIX_LOGGING__LEVEL=debug`)
//!
//! List values from the environment use array syntax:
//! `NATRIX_DISABLED_RULES='["NTX4", "NTX5"]'`.
//!
//! An explicit configuration file replaces steps 2 and 3.

use super::NatrixConfig;
use crate::{NatrixError, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default environment variable prefix
pub const ENV_PREFIX: &str = "NATRIX_";

/// Project-local configuration file
pub const CONFIG_FILENAME: &str = "natrix.toml";

/// Python project file whose `[tool.natrix]` table is read
pub const PYPROJECT_FILENAME: &str = "pyproject.toml";

const PYPROJECT_TABLE: [&str; 2] = ["tool", "natrix"];

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    project_dir: PathBuf,
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            project_dir: PathBuf::from("."),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Use this file instead of discovering one in the project directory
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Directory searched for `natrix.toml` and `pyproject.toml`
    pub fn with_project_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    pub fn load(&self) -> Result<NatrixConfig> {
        let mut figment = Figment::from(Serialized::defaults(NatrixConfig::default()));

        match &self.config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(NatrixError::Config(format!(
                        "configuration file not found: {}",
                        path.display()
                    )));
                }
                figment = merge_file(figment, path);
            }
            None => {
                let config_file = self.project_dir.join(CONFIG_FILENAME);
                if config_file.is_file() {
                    figment = merge_file(figment, &config_file);
                }
                let pyproject = self.project_dir.join(PYPROJECT_FILENAME);
                if has_natrix_table(&pyproject) {
                    figment = merge_file(figment, &pyproject);
                }
            }
        }

        figment = figment.merge(Env::prefixed(&self.env_prefix).split("__"));

        let config: NatrixConfig = figment.extract()?;
        validate_config(&config)?;
        Ok(config)
    }
}

/// Whether a discovered `pyproject.toml` carries a `[tool.natrix]` table
///
/// Files that do not parse belong to other tools and are skipped.
fn has_natrix_table(path: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(path) else {
        return false;
    };
    match content.parse::<toml::Table>() {
        Ok(table) => table
            .get(PYPROJECT_TABLE[0])
            .and_then(|tool| tool.get(PYPROJECT_TABLE[1]))
            .is_some_and(toml::Value::is_table),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Skipping unparsable pyproject.toml");
            false
        }
    }
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    debug!(path = %path.display(), "Loading configuration file");
    if path.file_name().is_some_and(|name| name == PYPROJECT_FILENAME) {
        let table = PYPROJECT_TABLE
            .iter()
            .fold(Figment::from(Toml::file(path)), |f, key| f.focus(key));
        figment.merge(table)
    } else {
        figment.merge(Toml::file(path))
    }
}

fn validate_config(config: &NatrixConfig) -> Result<()> {
    let code = Regex::new(r"^NTX\d+$").map_err(|e| NatrixError::Config(e.to_string()))?;
    if let Some(bad) = config.disabled_rules.iter().find(|c| !code.is_match(c)) {
        return Err(NatrixError::Config(format!(
            "invalid rule code '{bad}' in disabled_rules"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn loader(dir: &Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_project_dir(dir)
            .with_env_prefix("NATRIX_UNIT_TEST_UNSET_")
    }

    #[test]
    fn test_defaults_without_files() {
        let temp = TempDir::new().unwrap();
        let config = loader(temp.path()).load().unwrap();
        assert_eq!(config, NatrixConfig::default());
    }

    #[test]
    fn test_pyproject_table_is_read() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PYPROJECT_FILENAME),
            "[project]\nname = \"vault\"\n\n[tool.natrix]\ndisabled_rules = [\"NTX5\"]\nextra_paths = [\"lib\"]\n",
        )
        .unwrap();

        let config = loader(temp.path()).load().unwrap();
        assert_eq!(config.disabled_rules, vec!["NTX5"]);
        assert_eq!(config.extra_paths, vec![PathBuf::from("lib")]);
    }

    #[test]
    fn test_pyproject_overrides_natrix_toml() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            "exclude = [\"**/mocks\"]\ndisabled_rules = [\"NTX4\"]\n",
        )
        .unwrap();
        fs::write(
            temp.path().join(PYPROJECT_FILENAME),
            "[tool.natrix]\ndisabled_rules = [\"NTX6\"]\n",
        )
        .unwrap();

        let config = loader(temp.path()).load().unwrap();
        assert_eq!(config.exclude, vec!["**/mocks"]);
        assert_eq!(config.disabled_rules, vec!["NTX6"]);
    }

    #[test]
    fn test_pyproject_without_table_is_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PYPROJECT_FILENAME),
            "[tool.black]\nline-length = 88\n",
        )
        .unwrap();
        assert!(!has_natrix_table(&temp.path().join(PYPROJECT_FILENAME)));

        let config = loader(temp.path()).load().unwrap();
        assert_eq!(config, NatrixConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = loader(temp.path())
            .with_config_path(temp.path().join("absent.toml"))
            .load();
        assert!(matches!(result, Err(NatrixError::Config(_))));
    }

    #[test]
    fn test_invalid_rule_code_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(&path, "disabled_rules = [\"implicit-view\"]\n").unwrap();

        let result = loader(temp.path()).with_config_path(&path).load();
        assert!(matches!(result, Err(NatrixError::Config(_))));
    }
}
