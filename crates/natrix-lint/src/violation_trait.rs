//! Violation Trait
//!
//! Common interface for everything a rule can report, so the linter and the
//! reporters can handle issues without knowing which rule produced them.

use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;

pub use super::Severity;

/// Category of violation for grouping in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationCategory {
    /// Annotation does not match inferred mutability
    Mutability,
    /// Source could not be parsed
    Syntax,
}

impl Display for ViolationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mutability => write!(f, "Mutability"),
            Self::Syntax => write!(f, "Syntax"),
        }
    }
}

/// Generic violation trait - all violations implement this
pub trait Violation: Display + Send + Sync {
    /// Rule code (e.g., "NTX4")
    fn id(&self) -> &str;

    fn category(&self) -> ViolationCategory;

    fn severity(&self) -> Severity;

    fn file(&self) -> &PathBuf;

    /// 1-based line
    fn line(&self) -> usize;

    /// 1-based column
    fn column(&self) -> usize;

    /// Human-readable message describing the violation
    fn message(&self) -> String {
        self.to_string()
    }

    /// Suggested fix for the violation (if applicable)
    fn suggestion(&self) -> Option<String> {
        None
    }

    /// Convert to a boxed trait object for dynamic dispatch
    fn boxed(self) -> Box<dyn Violation>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// Extension trait for converting violations to boxed trait objects
pub trait ViolationExt {
    /// Convert to a vector of boxed violations
    fn into_boxed(self) -> Vec<Box<dyn Violation>>;
}

impl<T: Violation + 'static> ViolationExt for Vec<T> {
    fn into_boxed(self) -> Vec<Box<dyn Violation>> {
        self.into_iter()
            .map(|v| Box::new(v) as Box<dyn Violation>)
            .collect()
    }
}
