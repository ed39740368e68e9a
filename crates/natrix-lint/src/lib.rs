//! Mutability Linting for Vyper Contracts
//!
//! This crate infers what each contract function actually does to state and
//! compares it with the function's mutability annotation:
//! - State reads and writes through `self`, imported modules and the environment
//! - `staticcall` targets resolved to their declared interface mutability
//! - `extcall`s and value-transferring builtins
//! - Effects propagated along internal and module call chains
//!
//! It also generates `exports:` declarations and Mermaid call graphs.
//!
//! # Example
//!
//! ```ignore
//! use natrix_lint::{Linter, NatrixConfig};
//!
//! let config = NatrixConfig::default().with_extra_path("lib");
//! let report = Linter::new(config).lint_paths(&["contracts".into()])?;
//! for issue in &report.issues {
//!     println!("{issue}");
//! }
//! ```

pub mod violation_trait;
#[macro_use]
pub mod violation_macro;

pub mod analysis;
pub mod ast;
pub mod codegen;
pub mod config;
pub mod linter;
pub mod reporter;
pub mod resolver;
pub mod rules;
pub mod scan;

use std::path::PathBuf;
use thiserror::Error;

pub use analysis::{Analyzer, FunctionEffects, ModuleAnalysis};
pub use config::{ConfigLoader, LoggingConfig, NatrixConfig};
pub use linter::{Issue, LintReport, Linter};
pub use reporter::{OutputFormat, Reporter};
pub use rules::{Rule, RuleContext, RuleRegistry};
pub use violation_trait::{Violation, ViolationCategory};

/// Result type for natrix operations
pub type Result<T> = std::result::Result<T, NatrixError>;

/// Natrix error types
#[derive(Error, Debug)]
pub enum NatrixError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}:{line}:{column}: {message}", file.display())]
    Parse {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("Function '{function}' not found in {}", file.display())]
    UnknownFunction { file: PathBuf, function: String },

    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for NatrixError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Severity level for issues
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Style,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "ERROR"),
            Self::Warning => write!(f, "WARNING"),
            Self::Style => write!(f, "STYLE"),
        }
    }
}
