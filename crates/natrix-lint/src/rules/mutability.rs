//! NTX6: `@view` / `@pure` functions whose body breaks their annotation

use super::{MutabilityViolation, Rule, RuleContext};
use crate::Severity;
use crate::analysis::FunctionEffects;
use crate::ast::{FunctionDef, Mutability};
use crate::violation_trait::Violation;
use std::path::Path;

pub struct MutabilityRule;

impl Rule for MutabilityRule {
    fn code(&self) -> &'static str {
        "NTX6"
    }

    fn name(&self) -> &'static str {
        "mutability-violation"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "Function marked 'view' or 'pure' modifies state, calls out, or reads state under 'pure'"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Box<dyn Violation>> {
        if ctx.is_interface_file() {
            return Vec::new();
        }
        ctx.functions()
            .filter_map(|(function, effects)| violation(ctx.file, function, effects))
            .map(|v| Box::new(v) as Box<dyn Violation>)
            .collect()
    }
}

/// First way in which `function` breaks its declared mutability
fn violation(
    file: &Path,
    function: &FunctionDef,
    effects: &FunctionEffects,
) -> Option<MutabilityViolation> {
    let declared = function.declared_mutability().filter(|m| m.is_read_only())?;
    let name = function.name.clone();
    let (line, column) = (function.span.line, function.span.column);
    let file = file.to_path_buf();

    if let Some(write) = effects.first_write() {
        return Some(MutabilityViolation::StateWrite {
            function: name,
            declared: declared.to_string(),
            variable: write.variable.clone(),
            access_line: write.span.line,
            file,
            line,
            column,
        });
    }
    if let Some(call) = effects.extcalls.first() {
        return Some(MutabilityViolation::ExternalCall {
            function: name,
            declared: declared.to_string(),
            call_line: call.line,
            file,
            line,
            column,
        });
    }
    if declared != Mutability::Pure {
        return None;
    }
    if let Some(read) = effects.first_read() {
        return Some(MutabilityViolation::StateRead {
            function: name,
            variable: read.variable.clone(),
            access_line: read.span.line,
            file,
            line,
            column,
        });
    }
    effects
        .first_impure_staticcall()
        .map(|target| MutabilityViolation::ImpureStaticCall {
            function: name,
            target: target.label(),
            file,
            line,
            column,
        })
}
