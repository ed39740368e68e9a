//! Lint Rules
//!
//! Each rule inspects the analysed functions of one source unit and reports
//! [`Violation`]s. Rules are looked up by code through the [`RuleRegistry`].

pub mod implicit_pure;
pub mod implicit_view;
pub mod mutability;
pub mod registry;
pub mod violations;

pub use implicit_pure::ImplicitPureRule;
pub use implicit_view::ImplicitViewRule;
pub use mutability::MutabilityRule;
pub use registry::RuleRegistry;
pub use violations::{MutabilityViolation, SyntaxViolation};

use crate::Severity;
use crate::analysis::{FunctionEffects, ModuleAnalysis};
use crate::ast::FunctionDef;
use crate::resolver::SourceUnit;
use crate::violation_trait::Violation;
use std::path::Path;

/// Everything a rule may look at for one file
pub struct RuleContext<'a> {
    pub file: &'a Path,
    pub unit: &'a SourceUnit,
    pub analysis: &'a ModuleAnalysis,
}

impl<'a> RuleContext<'a> {
    pub fn new(file: &'a Path, unit: &'a SourceUnit, analysis: &'a ModuleAnalysis) -> Self {
        Self {
            file,
            unit,
            analysis,
        }
    }

    /// Functions paired with their transitive effects
    pub fn functions(&self) -> impl Iterator<Item = (&'a FunctionDef, &'a FunctionEffects)> {
        let analysis = self.analysis;
        self.unit
            .module
            .functions
            .iter()
            .filter_map(move |f| analysis.effects(&f.name).map(|e| (f, e)))
    }

    /// True when the file is a `.vyi` interface
    pub fn is_interface_file(&self) -> bool {
        self.unit.module.is_interface_file
    }
}

/// A lint rule
pub trait Rule: Send + Sync {
    /// Rule code (e.g., "NTX4")
    fn code(&self) -> &'static str;

    /// Short kebab-case name
    fn name(&self) -> &'static str;

    fn severity(&self) -> Severity;

    /// One-line description shown by `natrix rules`
    fn description(&self) -> &'static str;

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Box<dyn Violation>>;
}
