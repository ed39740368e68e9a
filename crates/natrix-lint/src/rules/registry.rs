//! Rule Registry
//!
//! Holds the rules that run for a lint pass, in code order.

use super::{ImplicitPureRule, ImplicitViewRule, MutabilityRule, Rule, RuleContext};
use crate::violation_trait::Violation;
use std::collections::HashSet;

/// Registry holding all enabled rules
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule to the registry
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Create registry with all standard rules
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ImplicitViewRule));
        registry.register(Box::new(ImplicitPureRule));
        registry.register(Box::new(MutabilityRule));
        registry
    }

    /// Standard rules minus the given codes
    pub fn with_disabled<S: AsRef<str>>(disabled: &[S]) -> Self {
        let disabled: HashSet<&str> = disabled.iter().map(|s| s.as_ref()).collect();
        let mut registry = Self::standard();
        registry.rules.retain(|r| !disabled.contains(r.code()));
        registry
    }

    /// Get all rules
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Get a rule by code
    pub fn get(&self, code: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.code() == code)
            .map(|r| &**r)
    }

    /// Check if a rule is registered
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Run every registered rule
    pub fn check(&self, ctx: &RuleContext<'_>) -> Vec<Box<dyn Violation>> {
        self.rules.iter().flat_map(|rule| rule.check(ctx)).collect()
    }
}
