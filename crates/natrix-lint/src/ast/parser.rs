//! Recursive-descent parser for Vyper modules
//!
//! Statements are parsed top-down; expressions use precedence climbing.
//! Module-level constructs that carry no mutability information (events,
//! structs, flags, `implements:`/`uses:`/`initializes:`) are skipped after
//! recording their names.

use super::lexer::{LexError, Token, TokenKind, tokenize};
use super::nodes::{
    BinOp, Call, Expr, ExprKind, FunctionDef, Import, InterfaceDef, InterfaceFunction, Keyword,
    Literal, Module, Mutability, Param, Span, Stmt, StmtKind, UnaryOp, VariableDecl, VariableKind,
};

/// Parse failure with position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self {
            message: err.message,
            span: err.span,
        }
    }
}

type PResult<T> = std::result::Result<T, ParseError>;

/// Parse a complete module
///
/// `name` becomes [`Module::name`]; `is_interface_file` marks `.vyi` sources.
pub fn parse_module(name: &str, source: &str, is_interface_file: bool) -> PResult<Module> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let mut module = Module {
        name: name.to_string(),
        is_interface_file,
        ..Module::default()
    };
    parser.parse_items(&mut module)?;
    Ok(module)
}

// Binding powers, loosest first.
const BP_TERNARY: u8 = 1;
const BP_OR: u8 = 3;
const BP_AND: u8 = 5;
const BP_NOT: u8 = 7;
const BP_UNARY: u8 = 23;

const BLOCK_KEYWORDS: &[&str] = &["event", "struct", "flag", "enum"];
const DIRECTIVES: &[&str] = &["implements", "uses", "initializes"];

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    // ---- token helpers -------------------------------------------------

    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> &Token {
        let index = (self.pos + n).min(self.tokens.len().saturating_sub(1));
        &self.tokens[index]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check_punct(&self, text: &str) -> bool {
        self.peek().is_punct(text)
    }

    fn check_name(&self, text: &str) -> bool {
        self.peek().is_name(text)
    }

    fn eat_punct(&mut self, text: &str) -> bool {
        if self.check_punct(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_name(&mut self, text: &str) -> bool {
        if self.check_name(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error_here(&self, expected: &str) -> ParseError {
        let token = self.peek();
        let found = match token.kind {
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Indent => "indent".to_string(),
            TokenKind::Dedent => "dedent".to_string(),
            TokenKind::Eof => "end of file".to_string(),
            _ => format!("'{}'", token.text),
        };
        ParseError {
            message: format!("expected {expected}, found {found}"),
            span: token.span,
        }
    }

    fn expect_punct(&mut self, text: &str) -> PResult<Token> {
        if self.check_punct(text) {
            Ok(self.advance())
        } else {
            Err(self.error_here(&format!("'{text}'")))
        }
    }

    fn expect_name_kw(&mut self, text: &str) -> PResult<Token> {
        if self.check_name(text) {
            Ok(self.advance())
        } else {
            Err(self.error_here(&format!("'{text}'")))
        }
    }

    fn expect_ident(&mut self) -> PResult<(String, Span)> {
        if self.peek().kind == TokenKind::Name {
            let token = self.advance();
            Ok((token.text, token.span))
        } else {
            Err(self.error_here("identifier"))
        }
    }

    fn expect_newline(&mut self) -> PResult<()> {
        self.eat_punct(";");
        match self.peek().kind {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof | TokenKind::Dedent => Ok(()),
            _ => Err(self.error_here("end of line")),
        }
    }

    fn skip_newlines(&mut self) {
        while self.peek().kind == TokenKind::Newline {
            self.advance();
        }
    }

    fn skip_line(&mut self) {
        while !matches!(self.peek().kind, TokenKind::Newline | TokenKind::Eof) {
            self.advance();
        }
        self.advance();
    }

    /// Skip an indented block (or the rest of a one-line block)
    fn skip_block(&mut self) -> PResult<()> {
        if self.peek().kind != TokenKind::Newline {
            self.skip_line();
            return Ok(());
        }
        self.advance();
        if self.peek().kind != TokenKind::Indent {
            return Err(self.error_here("indented block"));
        }
        let mut depth = 0usize;
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::Indent => depth += 1,
                TokenKind::Dedent => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                TokenKind::Eof => return Ok(()),
                _ => {}
            }
        }
    }

    // ---- module level --------------------------------------------------

    fn parse_items(&mut self, module: &mut Module) -> PResult<()> {
        loop {
            self.skip_newlines();
            if self.at_eof() {
                return Ok(());
            }

            let token = self.peek().clone();
            let next_is_colon = self.peek_nth(1).is_punct(":");
            let is_block_header =
                self.peek_nth(1).kind == TokenKind::Name && self.peek_nth(2).is_punct(":");

            match token.kind {
                TokenKind::Str => {
                    // module docstring
                    self.parse_expr()?;
                    self.expect_newline()?;
                }
                TokenKind::Punct if token.text == "@" => {
                    let function = self.parse_function()?;
                    module.functions.push(function);
                }
                TokenKind::Name => match token.text.as_str() {
                    "def" => {
                        let function = self.parse_function()?;
                        module.functions.push(function);
                    }
                    "interface" if is_block_header => {
                        let interface = self.parse_interface()?;
                        module.interfaces.push(interface);
                    }
                    kw if BLOCK_KEYWORDS.contains(&kw) && is_block_header => {
                        self.advance();
                        let (name, _) = self.expect_ident()?;
                        self.expect_punct(":")?;
                        self.skip_block()?;
                        module.type_names.push(name);
                    }
                    "import" => self.parse_import(module)?,
                    "from" => self.parse_from_import(module)?,
                    "exports" if next_is_colon => {
                        self.advance();
                        self.advance();
                        let value = self.parse_expr()?;
                        match value.kind {
                            ExprKind::Tuple(items) => module.exports.extend(items),
                            _ => module.exports.push(value),
                        }
                        self.expect_newline()?;
                    }
                    kw if DIRECTIVES.contains(&kw) && next_is_colon => self.skip_line(),
                    _ if next_is_colon => {
                        let variable = self.parse_variable()?;
                        module.variables.push(variable);
                    }
                    _ => return Err(self.error_here("module-level declaration")),
                },
                _ => return Err(self.error_here("module-level declaration")),
            }
        }
    }

    fn parse_import(&mut self, module: &mut Module) -> PResult<()> {
        let keyword = self.expect_name_kw("import")?;
        let path = self.parse_dotted_name()?;
        let alias = if self.eat_name("as") {
            self.expect_ident()?.0
        } else {
            path.rsplit('.').next().unwrap_or(&path).to_string()
        };
        module.imports.push(Import {
            path,
            alias,
            span: keyword.span,
        });
        self.expect_newline()
    }

    fn parse_from_import(&mut self, module: &mut Module) -> PResult<()> {
        self.expect_name_kw("from")?;
        let mut base = String::new();
        loop {
            if self.eat_punct(".") {
                base.push('.');
            } else if self.eat_punct("...") {
                base.push_str("...");
            } else {
                break;
            }
        }
        if self.peek().kind == TokenKind::Name && !self.check_name("import") {
            base.push_str(&self.parse_dotted_name()?);
        }
        self.expect_name_kw("import")?;

        let parenthesized = self.eat_punct("(");
        loop {
            let (name, span) = self.expect_ident()?;
            let alias = if self.eat_name("as") {
                self.expect_ident()?.0
            } else {
                name.clone()
            };
            let path = if base.is_empty() || base.ends_with('.') {
                format!("{base}{name}")
            } else {
                format!("{base}.{name}")
            };
            module.imports.push(Import { path, alias, span });

            if !self.eat_punct(",") {
                break;
            }
            if parenthesized && self.check_punct(")") {
                break;
            }
        }
        if parenthesized {
            self.expect_punct(")")?;
        }
        self.expect_newline()
    }

    fn parse_dotted_name(&mut self) -> PResult<String> {
        let (mut name, _) = self.expect_ident()?;
        while self.check_punct(".") && self.peek_nth(1).kind == TokenKind::Name {
            self.advance();
            name.push('.');
            name.push_str(&self.expect_ident()?.0);
        }
        Ok(name)
    }

    fn parse_interface(&mut self) -> PResult<InterfaceDef> {
        let keyword = self.expect_name_kw("interface")?;
        let (name, _) = self.expect_ident()?;
        self.expect_punct(":")?;
        self.expect_newline()?;
        if self.peek().kind != TokenKind::Indent {
            return Err(self.error_here("indented interface body"));
        }
        self.advance();

        let mut functions = Vec::new();
        loop {
            self.skip_newlines();
            let kind = self.peek().kind;
            match kind {
                TokenKind::Dedent => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => break,
                TokenKind::Str => {
                    self.advance();
                    self.expect_newline()?;
                }
                _ if self.eat_name("pass") => self.expect_newline()?,
                _ => {
                    self.expect_name_kw("def")?;
                    let (fn_name, _) = self.expect_ident()?;
                    self.parse_params()?;
                    if self.eat_punct("->") {
                        self.parse_expr()?;
                    }
                    self.expect_punct(":")?;
                    let (keyword, span) = self.expect_ident()?;
                    let mutability = Mutability::from_keyword(&keyword).ok_or_else(|| ParseError {
                        message: format!("unknown mutability '{keyword}'"),
                        span,
                    })?;
                    functions.push(InterfaceFunction {
                        name: fn_name,
                        mutability,
                    });
                    self.expect_newline()?;
                }
            }
        }

        Ok(InterfaceDef {
            name,
            functions,
            span: keyword.span,
        })
    }

    fn parse_variable(&mut self) -> PResult<VariableDecl> {
        let (name, span) = self.expect_ident()?;
        self.expect_punct(":")?;
        let mut type_expr = self.parse_expr()?;
        if self.eat_punct("=") {
            self.parse_expr()?;
        }
        self.expect_newline()?;

        let mut kind = VariableKind::Storage;
        let mut is_public = false;
        while let ExprKind::Call(call) = &type_expr.kind {
            let Some(wrapper) = call.func.as_name() else {
                break;
            };
            match wrapper {
                "public" => is_public = true,
                "constant" => kind = VariableKind::Constant,
                "immutable" => kind = VariableKind::Immutable,
                "transient" => kind = VariableKind::Transient,
                _ => break,
            }
            let Some(inner) = call.args.first() else {
                break;
            };
            type_expr = inner.clone();
        }

        Ok(VariableDecl {
            name,
            kind,
            is_public,
            type_expr,
            span,
        })
    }

    fn parse_function(&mut self) -> PResult<FunctionDef> {
        let mut decorators = Vec::new();
        let mut span = self.peek().span;
        while self.eat_punct("@") {
            let decorator = self.parse_expr()?;
            let name = match &decorator.kind {
                ExprKind::Call(call) => call.func.as_name().map(str::to_string),
                _ => decorator.as_name().map(str::to_string),
            };
            let name = name.ok_or_else(|| ParseError {
                message: "decorator must be a name".to_string(),
                span: decorator.span,
            })?;
            decorators.push(name);
            self.expect_newline()?;
            self.skip_newlines();
        }

        let keyword = self.expect_name_kw("def")?;
        if decorators.is_empty() {
            span = keyword.span;
        }
        let (name, _) = self.expect_ident()?;
        let params = self.parse_params()?;
        let returns = if self.eat_punct("->") {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect_punct(":")?;
        let body = self.parse_suite()?;

        Ok(FunctionDef {
            name,
            decorators,
            params,
            returns,
            body,
            span,
        })
    }

    fn parse_params(&mut self) -> PResult<Vec<Param>> {
        self.expect_punct("(")?;
        let mut params = Vec::new();
        while !self.check_punct(")") {
            let (name, _) = self.expect_ident()?;
            self.expect_punct(":")?;
            let annotation = self.parse_expr()?;
            let default = if self.eat_punct("=") {
                Some(self.parse_expr()?)
            } else {
                None
            };
            params.push(Param {
                name,
                annotation,
                default,
            });
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(")")?;
        Ok(params)
    }

    // ---- statements ----------------------------------------------------

    fn parse_suite(&mut self) -> PResult<Vec<Stmt>> {
        if self.peek().kind != TokenKind::Newline {
            let stmt = self.parse_simple_stmt()?;
            self.expect_newline()?;
            return Ok(vec![stmt]);
        }
        self.advance();
        if self.peek().kind != TokenKind::Indent {
            return Err(self.error_here("indented block"));
        }
        self.advance();

        let mut body = Vec::new();
        loop {
            self.skip_newlines();
            match self.peek().kind {
                TokenKind::Dedent => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => break,
                _ => body.push(self.parse_stmt()?),
            }
        }
        Ok(body)
    }

    fn parse_stmt(&mut self) -> PResult<Stmt> {
        if self.check_name("if") {
            let keyword = self.advance();
            return self.parse_if(keyword.span);
        }
        if self.check_name("for") {
            return self.parse_for();
        }
        let stmt = self.parse_simple_stmt()?;
        self.expect_newline()?;
        Ok(stmt)
    }

    fn parse_if(&mut self, span: Span) -> PResult<Stmt> {
        let test = self.parse_expr()?;
        self.expect_punct(":")?;
        let body = self.parse_suite()?;
        let orelse = if self.check_name("elif") {
            let keyword = self.advance();
            vec![self.parse_if(keyword.span)?]
        } else if self.eat_name("else") {
            self.expect_punct(":")?;
            self.parse_suite()?
        } else {
            Vec::new()
        };
        Ok(Stmt {
            kind: StmtKind::If { test, body, orelse },
            span,
        })
    }

    fn parse_for(&mut self) -> PResult<Stmt> {
        let keyword = self.expect_name_kw("for")?;
        let (name, name_span) = self.expect_ident()?;
        let target = Expr::new(ExprKind::Name(name), name_span);
        let annotation = if self.eat_punct(":") {
            Some(self.parse_postfix()?)
        } else {
            None
        };
        self.expect_name_kw("in")?;
        let iter = self.parse_expr()?;
        self.expect_punct(":")?;
        let body = self.parse_suite()?;
        Ok(Stmt {
            kind: StmtKind::For {
                target,
                annotation,
                iter,
                body,
            },
            span: keyword.span,
        })
    }

    fn parse_simple_stmt(&mut self) -> PResult<Stmt> {
        let span = self.peek().span;
        let at_line_end = |p: &Self| {
            matches!(
                p.peek().kind,
                TokenKind::Newline | TokenKind::Eof | TokenKind::Dedent
            ) || p.check_punct(";")
        };

        let kind = if self.eat_name("pass") {
            StmtKind::Pass
        } else if self.eat_name("break") {
            StmtKind::Break
        } else if self.eat_name("continue") {
            StmtKind::Continue
        } else if self.eat_name("return") {
            if at_line_end(self) {
                StmtKind::Return(None)
            } else {
                StmtKind::Return(Some(self.parse_expr_list()?))
            }
        } else if self.eat_name("raise") {
            if at_line_end(self) {
                StmtKind::Raise(None)
            } else {
                StmtKind::Raise(Some(self.parse_expr()?))
            }
        } else if self.eat_name("assert") {
            let test = self.parse_expr()?;
            let msg = if self.eat_punct(",") {
                Some(self.parse_expr()?)
            } else {
                None
            };
            StmtKind::Assert { test, msg }
        } else if self.check_name("log") && self.peek_nth(1).kind == TokenKind::Name {
            self.advance();
            StmtKind::Log(self.parse_expr()?)
        } else {
            let target = self.parse_expr_list()?;
            if self.eat_punct("=") {
                let value = self.parse_expr_list()?;
                StmtKind::Assign { target, value }
            } else if self.eat_punct(":") {
                let annotation = self.parse_expr()?;
                let value = if self.eat_punct("=") {
                    Some(self.parse_expr_list()?)
                } else {
                    None
                };
                StmtKind::AnnAssign {
                    target,
                    annotation,
                    value,
                }
            } else if let Some(op) = BinOp::from_augmented(&self.peek().text)
                && self.peek().kind == TokenKind::Punct
            {
                self.advance();
                let value = self.parse_expr()?;
                StmtKind::AugAssign { target, op, value }
            } else {
                StmtKind::Expr(target)
            }
        };

        Ok(Stmt { kind, span })
    }

    // ---- expressions ---------------------------------------------------

    /// Comma-separated expressions; a single element is returned unwrapped
    fn parse_expr_list(&mut self) -> PResult<Expr> {
        let first = self.parse_expr()?;
        if !self.check_punct(",") {
            return Ok(first);
        }
        let span = first.span;
        let mut items = vec![first];
        while self.eat_punct(",") {
            if self.starts_expr() {
                items.push(self.parse_expr()?);
            } else {
                break;
            }
        }
        Ok(Expr::new(ExprKind::Tuple(items), span))
    }

    fn starts_expr(&self) -> bool {
        let token = self.peek();
        match token.kind {
            TokenKind::Name | TokenKind::Number | TokenKind::Str => true,
            TokenKind::Punct => matches!(
                token.text.as_str(),
                "(" | "[" | "{" | "-" | "+" | "~" | "..."
            ),
            _ => false,
        }
    }

    fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> PResult<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            if self.check_name("if") && min_bp <= BP_TERNARY {
                self.advance();
                let test = self.parse_expr_bp(BP_OR)?;
                self.expect_name_kw("else")?;
                let orelse = self.parse_expr_bp(BP_TERNARY)?;
                let span = lhs.span;
                lhs = Expr::new(
                    ExprKind::IfExp {
                        test: Box::new(test),
                        body: Box::new(lhs),
                        orelse: Box::new(orelse),
                    },
                    span,
                );
                continue;
            }

            let Some((op, width, l_bp, r_bp)) = self.infix_op() else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            for _ in 0..width {
                self.advance();
            }
            let rhs = self.parse_expr_bp(r_bp)?;
            let span = lhs.span;
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                },
                span,
            );
        }

        Ok(lhs)
    }

    /// Infix operator at the cursor: `(op, token count, left bp, right bp)`
    fn infix_op(&self) -> Option<(BinOp, usize, u8, u8)> {
        let token = self.peek();
        let single = |op, l, r| Some((op, 1, l, r));
        match token.kind {
            TokenKind::Name => match token.text.as_str() {
                "or" => single(BinOp::Or, BP_OR, BP_OR + 1),
                "and" => single(BinOp::And, BP_AND, BP_AND + 1),
                "in" => single(BinOp::In, 9, 10),
                "not" if self.peek_nth(1).is_name("in") => Some((BinOp::NotIn, 2, 9, 10)),
                _ => None,
            },
            TokenKind::Punct => match token.text.as_str() {
                "==" => single(BinOp::Eq, 9, 10),
                "!=" => single(BinOp::NotEq, 9, 10),
                "<" => single(BinOp::Lt, 9, 10),
                "<=" => single(BinOp::LtE, 9, 10),
                ">" => single(BinOp::Gt, 9, 10),
                ">=" => single(BinOp::GtE, 9, 10),
                "|" => single(BinOp::BitOr, 11, 12),
                "^" => single(BinOp::BitXor, 13, 14),
                "&" => single(BinOp::BitAnd, 15, 16),
                "<<" => single(BinOp::Shl, 17, 18),
                ">>" => single(BinOp::Shr, 17, 18),
                "+" => single(BinOp::Add, 19, 20),
                "-" => single(BinOp::Sub, 19, 20),
                "*" => single(BinOp::Mul, 21, 22),
                "/" => single(BinOp::Div, 21, 22),
                "//" => single(BinOp::FloorDiv, 21, 22),
                "%" => single(BinOp::Mod, 21, 22),
                // right associative, binds tighter than unary minus on its left
                "**" => single(BinOp::Pow, 26, 25),
                _ => None,
            },
            _ => None,
        }
    }

    fn parse_prefix(&mut self) -> PResult<Expr> {
        let token = self.peek().clone();
        let unary = match (token.kind, token.text.as_str()) {
            (TokenKind::Name, "not") => Some((UnaryOp::Not, BP_NOT)),
            (TokenKind::Punct, "-") => Some((UnaryOp::Neg, BP_UNARY)),
            (TokenKind::Punct, "+") => Some((UnaryOp::Pos, BP_UNARY)),
            (TokenKind::Punct, "~") => Some((UnaryOp::Invert, BP_UNARY)),
            _ => None,
        };
        if let Some((op, bp)) = unary {
            self.advance();
            let operand = self.parse_expr_bp(bp)?;
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                token.span,
            ));
        }

        if token.is_name("staticcall") || token.is_name("extcall") {
            self.advance();
            let call = self.parse_postfix()?;
            if !matches!(call.kind, ExprKind::Call(_)) {
                return Err(ParseError {
                    message: format!("'{}' must be followed by a function call", token.text),
                    span: call.span,
                });
            }
            let kind = if token.text == "staticcall" {
                ExprKind::StaticCall(Box::new(call))
            } else {
                ExprKind::ExtCall(Box::new(call))
            };
            return Ok(Expr::new(kind, token.span));
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_atom()?;
        loop {
            if self.check_punct(".") && self.peek_nth(1).kind == TokenKind::Name {
                self.advance();
                let (attr, _) = self.expect_ident()?;
                let span = expr.span;
                expr = Expr::new(
                    ExprKind::Attribute {
                        value: Box::new(expr),
                        attr,
                    },
                    span,
                );
            } else if self.eat_punct("[") {
                let index = self.parse_expr_list()?;
                self.expect_punct("]")?;
                let span = expr.span;
                expr = Expr::new(
                    ExprKind::Subscript {
                        value: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else if self.check_punct("(") {
                let call = self.parse_call_args(expr)?;
                let span = call.func.span;
                expr = Expr::new(ExprKind::Call(call), span);
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_call_args(&mut self, func: Expr) -> PResult<Call> {
        self.expect_punct("(")?;
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        while !self.check_punct(")") {
            if self.peek().kind == TokenKind::Name && self.peek_nth(1).is_punct("=") {
                let (name, _) = self.expect_ident()?;
                self.advance();
                let value = self.parse_expr()?;
                keywords.push(Keyword { name, value });
            } else {
                args.push(self.parse_expr()?);
            }
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(")")?;
        Ok(Call {
            func: Box::new(func),
            args,
            keywords,
        })
    }

    fn parse_atom(&mut self) -> PResult<Expr> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Name => {
                self.advance();
                Ok(Expr::new(ExprKind::Name(token.text), token.span))
            }
            TokenKind::Number => {
                self.advance();
                Ok(Expr::new(
                    ExprKind::Literal(Literal::Number(token.text)),
                    token.span,
                ))
            }
            TokenKind::Str => {
                self.advance();
                Ok(Expr::new(
                    ExprKind::Literal(Literal::Str(token.text)),
                    token.span,
                ))
            }
            TokenKind::Punct => match token.text.as_str() {
                "..." => {
                    self.advance();
                    Ok(Expr::new(ExprKind::Ellipsis, token.span))
                }
                "(" => {
                    self.advance();
                    if self.eat_punct(")") {
                        return Ok(Expr::new(ExprKind::Tuple(Vec::new()), token.span));
                    }
                    let inner = self.parse_expr_list()?;
                    self.expect_punct(")")?;
                    Ok(inner)
                }
                "[" => {
                    self.advance();
                    let items = self.parse_sequence("]")?;
                    Ok(Expr::new(ExprKind::List(items), token.span))
                }
                "{" => {
                    self.advance();
                    let mut entries = Vec::new();
                    while !self.check_punct("}") {
                        let key = self.parse_expr()?;
                        self.expect_punct(":")?;
                        let value = self.parse_expr()?;
                        entries.push((key, value));
                        if !self.eat_punct(",") {
                            break;
                        }
                    }
                    self.expect_punct("}")?;
                    Ok(Expr::new(ExprKind::Dict(entries), token.span))
                }
                _ => Err(self.error_here("expression")),
            },
            _ => Err(self.error_here("expression")),
        }
    }

    fn parse_sequence(&mut self, close: &str) -> PResult<Vec<Expr>> {
        let mut items = Vec::new();
        while !self.check_punct(close) {
            items.push(self.parse_expr()?);
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(close)?;
        Ok(items)
    }
}
