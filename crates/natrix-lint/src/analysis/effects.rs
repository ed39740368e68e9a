//! Direct effects of a single function body
//!
//! Walks statements and expressions once, recording state accesses,
//! external calls and call sites. Callee effects are merged later by
//! [`super::Analyzer`].

use super::{AccessKind, CallSite, FunctionEffects, MemoryAccess, StaticCallTarget};
use crate::ast::{Call, Expr, ExprKind, FunctionDef, Literal, Mutability, Span, Stmt, StmtKind};
use crate::resolver::{ImportTarget, SourceUnit};
use std::collections::HashMap;

/// Environment namespaces whose members read chain state
const ENVIRONMENT: &[&str] = &["msg", "block", "tx", "chain"];

/// Members of an `address` value that read account state
const ADDRESS_MEMBERS: &[&str] = &["balance", "codehash", "codesize", "is_contract", "code"];

/// Builtins that hand control to another contract
const CALLING_BUILTINS: &[&str] = &[
    "send",
    "raw_call",
    "create_minimal_proxy_to",
    "create_copy_of",
    "create_from_blueprint",
];

/// Builtins that modify state without calling out
const WRITING_BUILTINS: &[&str] = &["selfdestruct", "raw_log"];

/// Builtins that read chain state
const READING_BUILTINS: &[&str] = &["blockhash", "blobhash"];

/// Effects of one function body before callees are taken into account
#[derive(Debug, Clone, Default)]
pub struct DirectEffects {
    pub effects: FunctionEffects,
    /// Call sites in order of appearance
    pub calls: Vec<CallSite>,
}

/// Collect the direct effects of `function`, declared in `unit`
pub fn collect<'a>(unit: &'a SourceUnit, function: &'a FunctionDef) -> DirectEffects {
    let mut walker = Walker {
        unit,
        locals: HashMap::new(),
        out: DirectEffects::default(),
    };
    for param in &function.params {
        walker.locals.insert(param.name.as_str(), &param.annotation);
    }
    walker.declare_locals(&function.body);
    for stmt in &function.body {
        walker.stmt(stmt);
    }
    walker.out
}

/// Interface named by a type or conversion expression
enum InterfaceRef<'a> {
    Local(&'a str),
    Qualified(&'a str, &'a str),
}

struct Walker<'a> {
    unit: &'a SourceUnit,
    /// Declared types of parameters and annotated locals
    locals: HashMap<&'a str, &'a Expr>,
    out: DirectEffects,
}

impl<'a> Walker<'a> {
    fn declare_locals(&mut self, body: &'a [Stmt]) {
        for stmt in body {
            match &stmt.kind {
                StmtKind::AnnAssign {
                    target, annotation, ..
                } => {
                    if let Some(name) = target.as_name() {
                        self.locals.insert(name, annotation);
                    }
                }
                StmtKind::For {
                    target,
                    annotation,
                    body,
                    ..
                } => {
                    if let (Some(name), Some(annotation)) = (target.as_name(), annotation) {
                        self.locals.insert(name, annotation);
                    }
                    self.declare_locals(body);
                }
                StmtKind::If { body, orelse, .. } => {
                    self.declare_locals(body);
                    self.declare_locals(orelse);
                }
                _ => {}
            }
        }
    }

    fn access(&mut self, variable: impl Into<String>, kind: AccessKind, span: Span) {
        self.out.effects.accesses.push(MemoryAccess {
            variable: variable.into(),
            kind,
            span,
        });
    }

    fn imported_state_variable(&self, alias: &str, attr: &str) -> bool {
        self.unit
            .imported_unit(alias)
            .is_some_and(|unit| unit.module.is_state_variable(attr))
    }

    // ---- statements ----------------------------------------------------

    fn stmt(&mut self, stmt: &'a Stmt) {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.expr(expr),
            StmtKind::Assign { target, value } => {
                self.expr(value);
                self.target(target);
            }
            StmtKind::AnnAssign { value, .. } => {
                if let Some(value) = value {
                    self.expr(value);
                }
            }
            StmtKind::AugAssign { target, value, .. } => {
                self.expr(value);
                self.expr(target);
                self.target(target);
            }
            StmtKind::Return(value) | StmtKind::Raise(value) => {
                if let Some(value) = value {
                    self.expr(value);
                }
            }
            StmtKind::Assert { test, msg } => {
                self.expr(test);
                if let Some(msg) = msg {
                    self.expr(msg);
                }
            }
            StmtKind::Log(event) => {
                let name = match &event.kind {
                    ExprKind::Call(call) => {
                        for arg in call.children().into_iter().skip(1) {
                            self.expr(arg);
                        }
                        call_name(call)
                    }
                    _ => "event".to_string(),
                };
                self.access(format!("log {name}"), AccessKind::Write, stmt.span);
            }
            StmtKind::If { test, body, orelse } => {
                self.expr(test);
                for s in body.iter().chain(orelse) {
                    self.stmt(s);
                }
            }
            StmtKind::For { iter, body, .. } => {
                self.expr(iter);
                for s in body {
                    self.stmt(s);
                }
            }
            StmtKind::Pass | StmtKind::Break | StmtKind::Continue => {}
        }
    }

    /// Assignment target: the state variable at its base is written
    fn target(&mut self, target: &'a Expr) {
        match &target.kind {
            ExprKind::Attribute { value, attr } => match value.as_name() {
                Some("self") if self.unit.module.is_state_variable(attr) => {
                    self.access(attr.clone(), AccessKind::Write, target.span);
                }
                Some(alias) if self.imported_state_variable(alias, attr) => {
                    self.access(format!("{alias}.{attr}"), AccessKind::Write, target.span);
                }
                _ => self.target(value),
            },
            ExprKind::Subscript { value, index } => {
                self.target(value);
                self.expr(index);
            }
            ExprKind::Tuple(items) | ExprKind::List(items) => {
                for item in items {
                    self.target(item);
                }
            }
            ExprKind::Name(_) => {}
            _ => self.expr(target),
        }
    }

    // ---- expressions ---------------------------------------------------

    fn expr(&mut self, expr: &'a Expr) {
        match &expr.kind {
            ExprKind::Name(name) if name == "self" => {
                self.access("self", AccessKind::Read, expr.span);
            }
            ExprKind::Attribute { value, attr } => self.attribute(expr, value, attr),
            ExprKind::Call(call) => self.call(call, expr.span),
            ExprKind::StaticCall(inner) => self.staticcall(inner),
            ExprKind::ExtCall(inner) => {
                self.out.effects.extcalls.push(expr.span);
                self.external_call_parts(inner);
            }
            _ => {
                for child in expr.children() {
                    self.expr(child);
                }
            }
        }
    }

    fn attribute(&mut self, expr: &'a Expr, value: &'a Expr, attr: &str) {
        match value.as_name() {
            Some("self") => {
                if self.unit.module.is_state_variable(attr) {
                    self.access(attr, AccessKind::Read, expr.span);
                } else if ADDRESS_MEMBERS.contains(&attr) {
                    self.access(format!("self.{attr}"), AccessKind::Read, expr.span);
                }
            }
            Some(env) if ENVIRONMENT.contains(&env) && !self.locals.contains_key(env) => {
                self.access(format!("{env}.{attr}"), AccessKind::Read, expr.span);
            }
            Some(alias) if self.imported_state_variable(alias, attr) => {
                self.access(format!("{alias}.{attr}"), AccessKind::Read, expr.span);
            }
            Some(local)
                if ADDRESS_MEMBERS.contains(&attr)
                    && self
                        .locals
                        .get(local)
                        .and_then(|ty| ty.as_name())
                        .is_some_and(|ty| ty == "address") =>
            {
                self.access(format!("{local}.{attr}"), AccessKind::Read, expr.span);
            }
            _ => self.expr(value),
        }
    }

    fn call(&mut self, call: &'a Call, span: Span) {
        match &call.func.kind {
            ExprKind::Attribute { value, attr } => match value.as_name() {
                Some("self") => {
                    if self.unit.module.function(attr).is_some() {
                        self.out.calls.push(CallSite::Internal(attr.clone()));
                    }
                }
                Some(alias) if self.unit.imports.contains_key(alias) => {
                    self.module_call(alias, attr);
                }
                _ if matches!(attr.as_str(), "append" | "pop") => {
                    // DynArray methods mutate their receiver
                    self.expr(value);
                    self.target(value);
                }
                _ => self.expr(&call.func),
            },
            ExprKind::Name(name) => self.builtin_call(name, call, span),
            _ => self.expr(&call.func),
        }
        for arg in call.args.iter().chain(call.keywords.iter().map(|k| &k.value)) {
            self.expr(arg);
        }
    }

    fn module_call(&mut self, alias: &str, function: &str) {
        match self.unit.imports.get(alias) {
            Some(ImportTarget::Module(unit)) => {
                if unit.module.function(function).is_some() {
                    self.out.calls.push(CallSite::Module {
                        alias: alias.to_string(),
                        function: function.to_string(),
                    });
                }
            }
            Some(ImportTarget::Unresolved) => {
                self.out
                    .effects
                    .opaque_calls
                    .push(format!("{alias}.{function}"));
            }
            Some(ImportTarget::Interface(_)) | None => {}
        }
    }

    fn builtin_call(&mut self, name: &str, call: &'a Call, span: Span) {
        if name == "raw_call" && is_true(call.keyword("is_static_call")) {
            self.out.effects.staticcalls.push(StaticCallTarget {
                interface: None,
                function: name.to_string(),
                mutability: None,
                span,
            });
        } else if CALLING_BUILTINS.contains(&name) {
            self.out.effects.extcalls.push(span);
        } else if WRITING_BUILTINS.contains(&name) {
            self.access(name, AccessKind::Write, span);
        } else if READING_BUILTINS.contains(&name) {
            self.access(name, AccessKind::Read, span);
        }
    }

    fn staticcall(&mut self, inner: &'a Expr) {
        let ExprKind::Call(call) = &inner.kind else {
            self.expr(inner);
            return;
        };

        let target = match &call.func.kind {
            ExprKind::Attribute { value, attr } => {
                let interface = self.receiver_interface(value);
                let mutability = interface
                    .as_ref()
                    .and_then(|iface| self.interface_mutability(iface, attr));
                StaticCallTarget {
                    interface: interface.map(|iface| match iface {
                        InterfaceRef::Local(name) => name.to_string(),
                        InterfaceRef::Qualified(alias, name) => format!("{alias}.{name}"),
                    }),
                    function: attr.clone(),
                    mutability,
                    span: inner.span,
                }
            }
            _ => StaticCallTarget {
                interface: None,
                function: call_name(call),
                mutability: None,
                span: inner.span,
            },
        };
        self.out.effects.staticcalls.push(target);
        self.external_call_parts(inner);
    }

    /// Walk receiver and arguments of an external call without treating the
    /// called member as an internal or module call
    fn external_call_parts(&mut self, inner: &'a Expr) {
        let ExprKind::Call(call) = &inner.kind else {
            self.expr(inner);
            return;
        };
        match &call.func.kind {
            ExprKind::Attribute { value, .. } => self.expr(value),
            _ => self.expr(&call.func),
        }
        for arg in call.args.iter().chain(call.keywords.iter().map(|k| &k.value)) {
            self.expr(arg);
        }
    }

    // ---- type resolution -----------------------------------------------

    fn receiver_interface(&self, receiver: &'a Expr) -> Option<InterfaceRef<'a>> {
        if let ExprKind::Call(conversion) = &receiver.kind {
            return match &conversion.func.kind {
                ExprKind::Name(name) if self.unit.is_interface(name) => {
                    Some(InterfaceRef::Local(name))
                }
                ExprKind::Attribute { value, attr } => value
                    .as_name()
                    .map(|alias| InterfaceRef::Qualified(alias, attr.as_str())),
                _ => None,
            };
        }
        interface_of_type(self.type_of(receiver)?)
    }

    /// Declared type of a storage variable, local, or element thereof
    fn type_of(&self, expr: &'a Expr) -> Option<&'a Expr> {
        match &expr.kind {
            ExprKind::Name(name) => self.locals.get(name.as_str()).copied(),
            ExprKind::Attribute { value, attr } if value.as_name() == Some("self") => {
                self.unit.module.variable(attr).map(|v| &v.type_expr)
            }
            ExprKind::Subscript { value, .. } => element_type(self.type_of(value)?),
            _ => None,
        }
    }

    fn interface_mutability(&self, iface: &InterfaceRef<'_>, function: &str) -> Option<Mutability> {
        match iface {
            InterfaceRef::Local(name) => self.unit.interface_function_mutability(name, function),
            InterfaceRef::Qualified(alias, name) => self
                .unit
                .imported_unit(alias)?
                .interface_function_mutability(name, function),
        }
    }
}

fn interface_of_type(ty: &Expr) -> Option<InterfaceRef<'_>> {
    match &ty.kind {
        ExprKind::Name(name) => Some(InterfaceRef::Local(name)),
        ExprKind::Attribute { value, attr } => value
            .as_name()
            .map(|alias| InterfaceRef::Qualified(alias, attr.as_str())),
        _ => None,
    }
}

/// Element type of `HashMap[K, V]`, `DynArray[T, N]` and `T[N]`
fn element_type(ty: &Expr) -> Option<&Expr> {
    let ExprKind::Subscript { value, index } = &ty.kind else {
        return None;
    };
    let params: Vec<&Expr> = match &index.kind {
        ExprKind::Tuple(items) => items.iter().collect(),
        _ => vec![index.as_ref()],
    };
    match value.as_name() {
        Some("HashMap") => params.get(1).copied(),
        Some("DynArray") => params.first().copied(),
        _ => Some(value.as_ref()),
    }
}

fn call_name(call: &Call) -> String {
    match &call.func.kind {
        ExprKind::Name(name) => name.clone(),
        ExprKind::Attribute { attr, .. } => attr.clone(),
        _ => "call".to_string(),
    }
}

fn is_true(expr: Option<&Expr>) -> bool {
    expr.is_some_and(|e| match &e.kind {
        ExprKind::Name(name) => name == "True",
        ExprKind::Literal(Literal::Number(n)) => n == "1",
        _ => false,
    })
}
