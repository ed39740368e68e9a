//! Configuration
//!
//! Settings can come from `natrix.toml`, the `[tool.natrix]` table of
//! `pyproject.toml`, and `NATRIX_*` environment variables; see
//! [`ConfigLoader`] for the merge order.
//!
//! # Example Configuration
//!
//! ```toml
//! [tool.natrix]
//! files = ["contracts"]
//! exclude = ["**/mocks"]
//! disabled_rules = ["NTX5"]
//! extra_paths = ["lib"]
//!
//! [tool.natrix.logging]
//! level = "debug"
//! ```

pub mod loader;

pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Linter configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NatrixConfig {
    /// Files or directories linted when none are given on the command line
    pub files: Vec<PathBuf>,

    /// Glob patterns of paths to skip
    pub exclude: Vec<String>,

    /// Rule codes that are not run
    pub disabled_rules: Vec<String>,

    /// Additional directories searched for imported modules
    pub extra_paths: Vec<PathBuf>,

    pub logging: LoggingConfig,
}

impl NatrixConfig {
    pub fn with_extra_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_paths.push(path.into());
        self
    }

    pub fn with_disabled_rule(mut self, code: impl Into<String>) -> Self {
        self.disabled_rules.push(code.into());
        self
    }

    pub fn with_exclude_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }
}

/// Logging settings for the command line tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `NATRIX_LOG` is not set
    pub level: String,
    /// Emit JSON lines instead of human-readable logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json_format: false,
        }
    }
}
