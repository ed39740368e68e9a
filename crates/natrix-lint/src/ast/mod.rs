//! Vyper Front End
//!
//! Tokenizer, syntax tree and parser for the subset of Vyper the mutability
//! analysis needs: imports, interfaces, state declarations, `exports:` and
//! function bodies with `staticcall`/`extcall` expressions.

pub mod lexer;
pub mod nodes;
pub mod parser;

pub use nodes::{
    BinOp, Call, Expr, ExprKind, FunctionDef, Import, InterfaceDef, InterfaceFunction, Keyword,
    Literal, Module, Mutability, Param, Span, Stmt, StmtKind, UnaryOp, VariableDecl, VariableKind,
    Visibility,
};
pub use parser::{ParseError, parse_module};

use crate::{NatrixError, Result};
use std::path::Path;

/// Extension of Vyper interface files
pub const INTERFACE_EXTENSION: &str = "vyi";

/// Read and parse a `.vy` / `.vyi` file
pub fn parse_file(path: &Path) -> Result<Module> {
    let source = std::fs::read_to_string(path)?;
    parse_source(path, &source)
}

/// Parse source text attributed to `path`
pub fn parse_source(path: &Path, source: &str) -> Result<Module> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("contract");
    let is_interface = path
        .extension()
        .is_some_and(|ext| ext == INTERFACE_EXTENSION);

    parse_module(name, source, is_interface).map_err(|err| NatrixError::Parse {
        file: path.to_path_buf(),
        line: err.span.line,
        column: err.span.column,
        message: err.message,
    })
}
