//! NTX4: functions that only read state but are not marked `@view`

use super::{MutabilityViolation, Rule, RuleContext};
use crate::Severity;
use crate::ast::Mutability;
use crate::violation_trait::Violation;

pub struct ImplicitViewRule;

impl Rule for ImplicitViewRule {
    fn code(&self) -> &'static str {
        "NTX4"
    }

    fn name(&self) -> &'static str {
        "implicit-view"
    }

    fn severity(&self) -> Severity {
        Severity::Style
    }

    fn description(&self) -> &'static str {
        "Function reads contract state but is not marked as 'view'"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Box<dyn Violation>> {
        if ctx.is_interface_file() {
            return Vec::new();
        }

        let mut violations: Vec<Box<dyn Violation>> = Vec::new();
        for (function, effects) in ctx.functions() {
            if function.is_constructor()
                || !function.accepts_read_only()
                || matches!(
                    function.declared_mutability(),
                    Some(Mutability::View | Mutability::Pure)
                )
            {
                continue;
            }
            // Pure-only staticcalls are left to NTX5
            if effects.only_pure_staticcalls() {
                continue;
            }
            if effects.reads_state() && !effects.writes_state() && !effects.has_extcalls() {
                violations.push(Box::new(MutabilityViolation::ImplicitView {
                    function: function.name.clone(),
                    file: ctx.file.to_path_buf(),
                    line: function.span.line,
                    column: function.span.column,
                }));
            }
        }
        violations
    }
}
