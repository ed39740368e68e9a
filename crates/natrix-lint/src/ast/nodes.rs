//! Syntax tree for the supported Vyper subset

use serde::Serialize;
use std::fmt;

/// Source position (1-based line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// State mutability, ordered from most to least restrictive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    Pure,
    View,
    Nonpayable,
    Payable,
}

impl Mutability {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "pure" => Some(Self::Pure),
            "view" => Some(Self::View),
            "nonpayable" => Some(Self::Nonpayable),
            "payable" => Some(Self::Payable),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pure => "pure",
            Self::View => "view",
            Self::Nonpayable => "nonpayable",
            Self::Payable => "payable",
        }
    }

    /// True when calling a function of this mutability cannot modify state
    pub fn is_read_only(self) -> bool {
        self <= Self::View
    }
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed source file
#[derive(Debug, Clone, Default)]
pub struct Module {
    /// Module name (file stem)
    pub name: String,
    /// `.vyi` interface file
    pub is_interface_file: bool,
    pub imports: Vec<Import>,
    pub interfaces: Vec<InterfaceDef>,
    pub variables: Vec<VariableDecl>,
    pub functions: Vec<FunctionDef>,
    /// Entries of `exports:` declarations
    pub exports: Vec<Expr>,
    /// Names declared by `struct`, `event` and `flag` blocks
    pub type_names: Vec<String>,
}

impl Module {
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn variable(&self, name: &str) -> Option<&VariableDecl> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceDef> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn import(&self, alias: &str) -> Option<&Import> {
        self.imports.iter().find(|i| i.alias == alias)
    }

    /// True if `name` is a state variable (storage, transient or immutable)
    pub fn is_state_variable(&self, name: &str) -> bool {
        self.variable(name).is_some_and(|v| v.kind.is_state())
    }
}

/// `import a.b as c` / `from a import b as c`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Dotted path, leading dots preserved for relative imports
    pub path: String,
    pub alias: String,
    pub span: Span,
}

/// Inline `interface Name:` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDef {
    pub name: String,
    pub functions: Vec<InterfaceFunction>,
    pub span: Span,
}

impl InterfaceDef {
    pub fn mutability_of(&self, function: &str) -> Option<Mutability> {
        self.functions
            .iter()
            .find(|f| f.name == function)
            .map(|f| f.mutability)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceFunction {
    pub name: String,
    pub mutability: Mutability,
}

/// Storage class of a module-level declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VariableKind {
    Storage,
    Transient,
    Immutable,
    Constant,
}

impl VariableKind {
    pub fn is_state(self) -> bool {
        !matches!(self, Self::Constant)
    }
}

#[derive(Debug, Clone)]
pub struct VariableDecl {
    pub name: String,
    pub kind: VariableKind,
    pub is_public: bool,
    /// Declared type with `public(...)`/`constant(...)` wrappers removed
    pub type_expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub annotation: Expr,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    External,
    Internal,
    Deploy,
}

#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    /// Decorator names in source order (`nonreentrant("lock")` becomes `nonreentrant`)
    pub decorators: Vec<String>,
    pub params: Vec<Param>,
    pub returns: Option<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl FunctionDef {
    pub fn has_decorator(&self, name: &str) -> bool {
        self.decorators.iter().any(|d| d == name)
    }

    /// Mutability declared by decorator, if any
    pub fn declared_mutability(&self) -> Option<Mutability> {
        self.decorators
            .iter()
            .find_map(|d| Mutability::from_keyword(d))
    }

    /// Effective declared mutability (unannotated functions are nonpayable)
    pub fn mutability(&self) -> Mutability {
        self.declared_mutability().unwrap_or(Mutability::Nonpayable)
    }

    /// Whether `@view` or `@pure` may be added without a compiler error
    pub fn accepts_read_only(&self) -> bool {
        !self.has_decorator("payable") && !self.has_decorator("nonreentrant")
    }

    pub fn is_constructor(&self) -> bool {
        self.name == "__init__" || self.has_decorator("deploy")
    }

    pub fn visibility(&self) -> Visibility {
        if self.is_constructor() {
            Visibility::Deploy
        } else if self.has_decorator("external") {
            Visibility::External
        } else {
            Visibility::Internal
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Identifier text for `Name` expressions
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Name(name) => Some(name),
            _ => None,
        }
    }

    /// `(base, attr)` for `base.attr` where `base` is a plain name
    pub fn as_qualified_name(&self) -> Option<(&str, &str)> {
        match &self.kind {
            ExprKind::Attribute { value, attr } => Some((value.as_name()?, attr)),
            _ => None,
        }
    }

    /// Child expressions in evaluation order
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Name(_) | ExprKind::Literal(_) | ExprKind::Ellipsis => Vec::new(),
            ExprKind::Attribute { value, .. } => vec![&**value],
            ExprKind::Subscript { value, index } => vec![&**value, &**index],
            ExprKind::Call(call) => call.children(),
            ExprKind::StaticCall(inner) | ExprKind::ExtCall(inner) => vec![&**inner],
            ExprKind::Unary { operand, .. } => vec![&**operand],
            ExprKind::Binary { left, right, .. } => vec![&**left, &**right],
            ExprKind::IfExp { test, body, orelse } => vec![&**body, &**test, &**orelse],
            ExprKind::Tuple(items) | ExprKind::List(items) => items.iter().collect(),
            ExprKind::Dict(entries) => entries.iter().flat_map(|(k, v)| [k, v]).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Name(String),
    Literal(Literal),
    Ellipsis,
    Attribute { value: Box<Expr>, attr: String },
    Subscript { value: Box<Expr>, index: Box<Expr> },
    Call(Call),
    /// `staticcall <call>`
    StaticCall(Box<Expr>),
    /// `extcall <call>`
    ExtCall(Box<Expr>),
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinOp, left: Box<Expr>, right: Box<Expr> },
    IfExp { test: Box<Expr>, body: Box<Expr>, orelse: Box<Expr> },
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Number(String),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
    pub keywords: Vec<Keyword>,
}

impl Call {
    pub fn keyword(&self, name: &str) -> Option<&Expr> {
        self.keywords
            .iter()
            .find(|k| k.name == name)
            .map(|k| &k.value)
    }

    pub fn children(&self) -> Vec<&Expr> {
        let mut out = vec![self.func.as_ref()];
        out.extend(self.args.iter());
        out.extend(self.keywords.iter().map(|k| &k.value));
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
    Invert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    In,
    NotIn,
    BitOr,
    BitXor,
    BitAnd,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinOp {
    /// Operator for an augmented assignment token such as `+=`
    pub fn from_augmented(token: &str) -> Option<Self> {
        Some(match token {
            "+=" => Self::Add,
            "-=" => Self::Sub,
            "*=" => Self::Mul,
            "/=" => Self::Div,
            "//=" => Self::FloorDiv,
            "%=" => Self::Mod,
            "**=" => Self::Pow,
            "&=" => Self::BitAnd,
            "|=" => Self::BitOr,
            "^=" => Self::BitXor,
            "<<=" => Self::Shl,
            ">>=" => Self::Shr,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Expr(Expr),
    Assign { target: Expr, value: Expr },
    AnnAssign { target: Expr, annotation: Expr, value: Option<Expr> },
    AugAssign { target: Expr, op: BinOp, value: Expr },
    Return(Option<Expr>),
    Pass,
    Break,
    Continue,
    Assert { test: Expr, msg: Option<Expr> },
    Raise(Option<Expr>),
    Log(Expr),
    If { test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt> },
    For { target: Expr, annotation: Option<Expr>, iter: Expr, body: Vec<Stmt> },
}
