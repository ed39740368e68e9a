//! Shared test utilities for natrix-lint tests

#![allow(dead_code)] // Test utilities may not all be used in every test file

use natrix_lint::{LintReport, Linter, NatrixConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Path of a contract under `tests/contracts`
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("contracts")
        .join(name)
}

/// Write a contract into the temp dir, creating parent directories
pub fn write_contract(temp: &TempDir, relative: &str, content: &str) -> PathBuf {
    let path = temp.path().join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Lint one file with the default configuration
pub fn lint_file(path: &Path) -> LintReport {
    Linter::new(NatrixConfig::default()).lint_file(path).unwrap()
}

/// Lint source text with the default configuration
pub fn lint_source(source: &str) -> LintReport {
    Linter::new(NatrixConfig::default())
        .lint_source(Path::new("/nonexistent/contract.vy"), source)
        .unwrap()
}

/// `(code, line)` of every issue mentioning `function`
pub fn issues_for(report: &LintReport, function: &str) -> Vec<(String, usize)> {
    let needle = format!("'{function}'");
    report
        .issues
        .iter()
        .filter(|i| i.message.contains(&needle))
        .map(|i| (i.code.clone(), i.line))
        .collect()
}
