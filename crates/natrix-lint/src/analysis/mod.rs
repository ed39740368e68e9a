//! Mutability Analysis
//!
//! Computes, for every function of a module, the state it reads and writes
//! and the external calls it makes, including everything reachable through
//! internal (`self.f()`) and module (`lib.f()`) calls.
//!
//! # Example
//!
//! ```ignore
//! use natrix_lint::analysis::Analyzer;
//! use natrix_lint::resolver::ModuleLoader;
//!
//! let mut loader = ModuleLoader::new(Vec::new());
//! let unit = loader.load(Path::new("token.vy"))?;
//! let analysis = Analyzer::new().analyze(&unit);
//! let effects = analysis.effects("balance_of").unwrap();
//! assert!(effects.reads_state() && !effects.writes_state());
//! ```

pub mod effects;

use crate::ast::{Mutability, Span};
use crate::resolver::SourceUnit;
use effects::DirectEffects;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::trace;

/// Direction of a state access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    Read,
    Write,
}

/// One read or write of contract or chain state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryAccess {
    /// State variable name, `module.variable`, or an environment member such as `msg.sender`
    pub variable: String,
    pub kind: AccessKind,
    pub span: Span,
}

/// Callee of a `staticcall`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticCallTarget {
    pub interface: Option<String>,
    pub function: String,
    /// Declared mutability, `None` when the interface could not be resolved
    pub mutability: Option<Mutability>,
    pub span: Span,
}

impl StaticCallTarget {
    pub fn is_pure(&self) -> bool {
        self.mutability == Some(Mutability::Pure)
    }

    /// `IFoo.bar` style label for messages
    pub fn label(&self) -> String {
        match &self.interface {
            Some(interface) => format!("{interface}.{}", self.function),
            None => self.function.clone(),
        }
    }
}

/// A call from one function to another function of the same compilation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallSite {
    /// `self.f()`
    Internal(String),
    /// `alias.f()` into an imported module
    Module { alias: String, function: String },
}

impl CallSite {
    /// Node label used by the call graph
    pub fn label(&self) -> String {
        match self {
            Self::Internal(name) => name.clone(),
            Self::Module { alias, function } => format!("{alias}.{function}"),
        }
    }
}

/// Everything a function does to state, callees included
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionEffects {
    pub accesses: Vec<MemoryAccess>,
    pub staticcalls: Vec<StaticCallTarget>,
    /// Locations of `extcall`s and value-transferring builtins
    pub extcalls: Vec<Span>,
    /// Calls into modules that could not be resolved
    pub opaque_calls: Vec<String>,
}

impl FunctionEffects {
    /// Reads state directly or through a non-pure `staticcall`
    pub fn reads_state(&self) -> bool {
        self.first_read().is_some() || self.staticcalls.iter().any(|s| !s.is_pure())
    }

    pub fn writes_state(&self) -> bool {
        self.first_write().is_some()
    }

    pub fn first_read(&self) -> Option<&MemoryAccess> {
        self.accesses.iter().find(|a| a.kind == AccessKind::Read)
    }

    pub fn first_write(&self) -> Option<&MemoryAccess> {
        self.accesses.iter().find(|a| a.kind == AccessKind::Write)
    }

    pub fn has_extcalls(&self) -> bool {
        !self.extcalls.is_empty()
    }

    pub fn has_staticcalls(&self) -> bool {
        !self.staticcalls.is_empty()
    }

    /// True when there is at least one `staticcall` and every one targets a
    /// `pure` function
    pub fn only_pure_staticcalls(&self) -> bool {
        self.has_staticcalls() && self.staticcalls.iter().all(StaticCallTarget::is_pure)
    }

    pub fn first_impure_staticcall(&self) -> Option<&StaticCallTarget> {
        self.staticcalls.iter().find(|s| !s.is_pure())
    }

    pub fn is_opaque(&self) -> bool {
        !self.opaque_calls.is_empty()
    }

    fn merge(&mut self, other: &FunctionEffects) {
        self.accesses.extend(other.accesses.iter().cloned());
        self.staticcalls.extend(other.staticcalls.iter().cloned());
        self.extcalls.extend(other.extcalls.iter().copied());
        self.opaque_calls.extend(other.opaque_calls.iter().cloned());
    }
}

/// Analysis results for one module
#[derive(Debug, Default)]
pub struct ModuleAnalysis {
    effects: BTreeMap<String, FunctionEffects>,
    calls: Vec<(String, Vec<CallSite>)>,
}

impl ModuleAnalysis {
    /// Transitive effects of a function
    pub fn effects(&self, function: &str) -> Option<&FunctionEffects> {
        self.effects.get(function)
    }

    /// Call sites per function, in definition order, duplicates removed
    pub fn call_graph(&self) -> &[(String, Vec<CallSite>)] {
        &self.calls
    }
}

/// Analyses modules, caching results per file
#[derive(Debug, Default)]
pub struct Analyzer {
    cache: HashMap<PathBuf, Arc<ModuleAnalysis>>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(&mut self, unit: &SourceUnit) -> Arc<ModuleAnalysis> {
        if let Some(cached) = self.cache.get(&unit.path) {
            return Arc::clone(cached);
        }

        let mut direct: BTreeMap<String, DirectEffects> = BTreeMap::new();
        let mut calls = Vec::new();
        for function in &unit.module.functions {
            let mut found = effects::collect(unit, function);
            self.merge_module_calls(unit, &mut found);

            let mut seen = HashSet::new();
            let sites = found
                .calls
                .iter()
                .filter(|site| seen.insert((*site).clone()))
                .cloned()
                .collect();
            calls.push((function.name.clone(), sites));
            direct.insert(function.name.clone(), found);
        }

        let mut resolved = BTreeMap::new();
        for name in direct.keys() {
            let mut visiting = HashSet::new();
            resolve(name, &direct, &mut resolved, &mut visiting);
        }
        trace!(module = %unit.module.name, functions = resolved.len(), "Module analysed");

        let analysis = Arc::new(ModuleAnalysis {
            effects: resolved,
            calls,
        });
        self.cache.insert(unit.path.clone(), Arc::clone(&analysis));
        analysis
    }

    fn merge_module_calls(&mut self, unit: &SourceUnit, found: &mut DirectEffects) {
        for site in &found.calls {
            let CallSite::Module { alias, function } = site else {
                continue;
            };
            let Some(imported) = unit.imported_unit(alias) else {
                continue;
            };
            let analysis = self.analyze(imported);
            match analysis.effects(function) {
                Some(callee) => found.effects.merge(callee),
                None => found.effects.opaque_calls.push(site.label()),
            }
        }
    }
}

/// Merge callee effects into `name` depth first; recursion is cut at cycles
fn resolve(
    name: &str,
    direct: &BTreeMap<String, DirectEffects>,
    resolved: &mut BTreeMap<String, FunctionEffects>,
    visiting: &mut HashSet<String>,
) -> FunctionEffects {
    if let Some(done) = resolved.get(name) {
        return done.clone();
    }
    let Some(own) = direct.get(name) else {
        return FunctionEffects::default();
    };
    if !visiting.insert(name.to_string()) {
        return FunctionEffects::default();
    }

    let mut effects = own.effects.clone();
    for site in &own.calls {
        if let CallSite::Internal(callee) = site {
            let callee_effects = resolve(callee, direct, resolved, visiting);
            effects.merge(&callee_effects);
        }
    }

    visiting.remove(name);
    resolved.insert(name.to_string(), effects.clone());
    effects
}
