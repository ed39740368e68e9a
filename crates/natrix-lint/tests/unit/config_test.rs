//! Tests for configuration layering
//!
//! Each test uses its own environment prefix so tests can run in parallel.

use natrix_lint::{ConfigLoader, NatrixError};
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to set env var
fn set_env(key: &str, value: &str) {
    // SAFETY: the variable name is unique to one test
    unsafe {
        env::set_var(key, value);
    }
}

/// Helper to remove env var
fn remove_env(key: &str) {
    // SAFETY: the variable name is unique to one test
    unsafe {
        env::remove_var(key);
    }
}

#[test]
fn test_env_overrides_file() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("natrix.toml"),
        "disabled_rules = [\"NTX4\"]\n\n[logging]\nlevel = \"info\"\n",
    )
    .unwrap();
    set_env("NATRIX_LAYER_TEST_LOGGING__LEVEL", "debug");

    let config = ConfigLoader::new()
        .with_project_dir(temp.path())
        .with_env_prefix("NATRIX_LAYER_TEST_")
        .load()
        .unwrap();
    remove_env("NATRIX_LAYER_TEST_LOGGING__LEVEL");

    assert_eq!(config.disabled_rules, vec!["NTX4"]);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_env_list_value() {
    let temp = TempDir::new().unwrap();
    set_env("NATRIX_LIST_TEST_EXTRA_PATHS", "[\"lib\", \"vendor\"]");

    let config = ConfigLoader::new()
        .with_project_dir(temp.path())
        .with_env_prefix("NATRIX_LIST_TEST_")
        .load()
        .unwrap();
    remove_env("NATRIX_LIST_TEST_EXTRA_PATHS");

    assert_eq!(
        config.extra_paths,
        vec![PathBuf::from("lib"), PathBuf::from("vendor")]
    );
}

#[test]
fn test_env_disabled_rules_array() {
    let temp = TempDir::new().unwrap();
    set_env("NATRIX_RULES_TEST_DISABLED_RULES", "[\"NTX4\", \"NTX5\"]");

    let config = ConfigLoader::new()
        .with_project_dir(temp.path())
        .with_env_prefix("NATRIX_RULES_TEST_")
        .load()
        .unwrap();
    remove_env("NATRIX_RULES_TEST_DISABLED_RULES");

    assert_eq!(config.disabled_rules, vec!["NTX4", "NTX5"]);
}

#[test]
fn test_explicit_pyproject_uses_tool_table() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("pyproject.toml");
    fs::write(
        &path,
        "[tool.ruff]\nline-length = 100\n\n[tool.natrix]\nexclude = [\"**/test_*.vy\"]\n",
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("NATRIX_PYPROJECT_TEST_")
        .load()
        .unwrap();
    assert_eq!(config.exclude, vec!["**/test_*.vy"]);
}

#[test]
fn test_wrong_type_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("natrix.toml");
    fs::write(&path, "extra_paths = 3\n").unwrap();

    let result = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("NATRIX_TYPE_TEST_")
        .load();
    assert!(matches!(result, Err(NatrixError::Figment(_))));
}
