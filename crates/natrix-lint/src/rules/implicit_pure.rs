//! NTX5: functions that touch no state but are not marked `@pure`

use super::{MutabilityViolation, Rule, RuleContext};
use crate::Severity;
use crate::ast::Mutability;
use crate::violation_trait::Violation;

pub struct ImplicitPureRule;

impl Rule for ImplicitPureRule {
    fn code(&self) -> &'static str {
        "NTX5"
    }

    fn name(&self) -> &'static str {
        "implicit-pure"
    }

    fn severity(&self) -> Severity {
        Severity::Style
    }

    fn description(&self) -> &'static str {
        "Function does not access state but is not marked as 'pure'"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Box<dyn Violation>> {
        if ctx.is_interface_file() {
            return Vec::new();
        }

        let mut violations: Vec<Box<dyn Violation>> = Vec::new();
        for (function, effects) in ctx.functions() {
            if function.is_constructor()
                || !function.accepts_read_only()
                || function.declared_mutability() == Some(Mutability::Pure)
            {
                continue;
            }
            if effects.has_extcalls()
                || effects.first_impure_staticcall().is_some()
                || effects.is_opaque()
            {
                continue;
            }
            if effects.first_read().is_none() && !effects.writes_state() {
                violations.push(Box::new(MutabilityViolation::ImplicitPure {
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
