//! Indentation-aware tokenizer for Vyper source.
//!
//! Produces a flat token stream with explicit `Newline`, `Indent` and `Dedent`
//! markers so the parser never has to look at whitespace. Newlines inside
//! brackets are insignificant, comments are dropped.

use super::nodes::Span;

/// Token category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Name,
    Number,
    Str,
    Punct,
    Newline,
    Indent,
    Dedent,
    Eof,
}

/// A single lexed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            span: Span::new(line, column),
        }
    }

    /// True for a punctuation token with exactly this text
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    /// True for a name token with exactly this text (keywords are names)
    pub fn is_name(&self, text: &str) -> bool {
        self.kind == TokenKind::Name && self.text == text
    }
}

/// Lexing failure with position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

// Longest first so that greedy matching picks `**=` over `**` over `*`.
const PUNCTUATION: &[&str] = &[
    "...", "**=", "//=", "<<=", ">>=", "->", "**", "//", "<<", ">>", "<=", ">=", "==", "!=",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", ":=", "+", "-", "*", "/", "%", "&", "|",
    "^", "~", "<", ">", "=", "(", ")", "[", "]", "{", "}", ":", ",", ".", "@", ";",
];

const TAB_WIDTH: usize = 8;

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    depth: usize,
    indents: Vec<usize>,
    tokens: Vec<Token>,
    at_line_start: bool,
}

/// Tokenize a complete source file
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer {
        chars: source.chars().collect(),
        pos: 0,
        line: 1,
        column: 1,
        depth: 0,
        indents: vec![0],
        tokens: Vec::new(),
        at_line_start: true,
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

impl Lexer {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            message: message.into(),
            span: Span::new(self.line, self.column),
        }
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>, line: usize, column: usize) {
        self.tokens.push(Token::new(kind, text, line, column));
    }

    fn last_is_newline(&self) -> bool {
        self.tokens
            .last()
            .is_none_or(|t| matches!(t.kind, TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent))
    }

    fn run(&mut self) -> Result<(), LexError> {
        while self.pos < self.chars.len() {
            if self.at_line_start && self.depth == 0 {
                self.at_line_start = false;
                if self.handle_indentation()? {
                    continue;
                }
            }

            let Some(c) = self.peek() else { break };
            match c {
                ' ' | '\t' | '\r' | '\x0c' => {
                    self.bump();
                }
                '#' => self.skip_comment(),
                '\\' if self.peek_at(1) == Some('\n') => {
                    self.bump();
                    self.bump();
                }
                '\n' => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    if self.depth == 0 {
                        if !self.last_is_newline() {
                            self.push(TokenKind::Newline, "\n", line, column);
                        }
                        self.at_line_start = true;
                    }
                }
                '"' | '\'' => self.lex_string()?,
                c if is_string_prefix(c) && matches!(self.peek_at(1), Some('"' | '\'')) => {
                    self.lex_string()?;
                }
                c if c.is_ascii_digit() => self.lex_number(),
                '.' if self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => self.lex_number(),
                c if c.is_alphabetic() || c == '_' => self.lex_name(),
                _ => self.lex_punct()?,
            }
        }

        let (line, column) = (self.line, self.column);
        if !self.last_is_newline() {
            self.push(TokenKind::Newline, "\n", line, column);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(TokenKind::Dedent, "", line, column);
        }
        self.push(TokenKind::Eof, "", line, column);
        Ok(())
    }

    /// Measure leading whitespace and emit indent/dedent tokens.
    ///
    /// Returns `true` when the line was blank or comment-only and has been
    /// consumed entirely.
    fn handle_indentation(&mut self) -> Result<bool, LexError> {
        let mut width = 0;
        while let Some(c) = self.peek() {
            match c {
                ' ' => width += 1,
                '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
                '\r' | '\x0c' => {}
                _ => break,
            }
            self.bump();
        }

        match self.peek() {
            None => return Ok(true),
            Some('\n') => {
                self.bump();
                self.at_line_start = true;
                return Ok(true);
            }
            Some('#') => {
                self.skip_comment();
                if self.peek() == Some('\n') {
                    self.bump();
                }
                self.at_line_start = true;
                return Ok(true);
            }
            Some(_) => {}
        }

        let current = self.indents.last().copied().unwrap_or(0);
        let (line, column) = (self.line, self.column);
        if width > current {
            self.indents.push(width);
            self.push(TokenKind::Indent, "", line, column);
        } else if width < current {
            while self.indents.last().is_some_and(|&w| w > width) {
                self.indents.pop();
                self.push(TokenKind::Dedent, "", line, column);
            }
            if self.indents.last().copied() != Some(width) {
                return Err(self.error("unindent does not match any outer indentation level"));
            }
        }
        Ok(false)
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn lex_name(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        self.push(TokenKind::Name, text, line, column);
    }

    fn lex_number(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        let radix_prefix = self.peek() == Some('0')
            && matches!(self.peek_at(1), Some('x' | 'X' | 'b' | 'B' | 'o' | 'O'));
        if radix_prefix {
            for _ in 0..2 {
                if let Some(c) = self.bump() {
                    text.push(c);
                }
            }
            while let Some(c) = self.peek() {
                if c.is_ascii_hexdigit() || c == '_' {
                    text.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
        } else {
            while let Some(c) = self.peek() {
                let exponent_sign = matches!(c, '+' | '-') && text.ends_with(['e', 'E']);
                if c.is_ascii_digit() || c == '_' || c == '.' || c == 'e' || c == 'E' || exponent_sign
                {
                    // `1...` never happens in Vyper, but `x[1].y` must not swallow the dot
                    if c == '.' && !self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) {
                        break;
                    }
                    text.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
        }
        self.push(TokenKind::Number, text, line, column);
    }

    fn lex_string(&mut self) -> Result<(), LexError> {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        if let Some(c) = self.peek()
            && is_string_prefix(c)
        {
            text.push(c);
            self.bump();
        }
        let Some(quote) = self.bump() else {
            return Err(self.error("unterminated string literal"));
        };
        text.push(quote);

        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            text.push(quote);
            text.push(quote);
            self.bump();
            self.bump();
        }

        loop {
            let Some(c) = self.bump() else {
                return Err(LexError {
                    message: "unterminated string literal".to_string(),
                    span: Span::new(line, column),
                });
            };
            text.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = self.bump() {
                        text.push(escaped);
                    }
                }
                '\n' if !triple => {
                    return Err(LexError {
                        message: "unterminated string literal".to_string(),
                        span: Span::new(line, column),
                    });
                }
                c if c == quote => {
                    if !triple {
                        break;
                    }
                    if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                        text.push(quote);
                        text.push(quote);
                        self.bump();
                        self.bump();
                        break;
                    }
                }
                _ => {}
            }
        }

        self.push(TokenKind::Str, text, line, column);
        Ok(())
    }

    fn lex_punct(&mut self) -> Result<(), LexError> {
        let (line, column) = (self.line, self.column);
        let matched = PUNCTUATION.iter().find(|p| {
            p.chars()
                .enumerate()
                .all(|(i, expected)| self.peek_at(i) == Some(expected))
        });
        let Some(punct) = matched else {
            let found = self.peek().unwrap_or('\0');
            return Err(self.error(format!("unexpected character '{found}'")));
        };

        for _ in 0..punct.len() {
            self.bump();
        }
        match *punct {
            "(" | "[" | "{" => self.depth += 1,
            ")" | "]" | "}" => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        self.push(TokenKind::Punct, *punct, line, column);
        Ok(())
    }
}

fn is_string_prefix(c: char) -> bool {
    matches!(c, 'b' | 'B' | 'x' | 'X' | 'r' | 'R')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_indent_and_dedent_are_balanced() {
        let source = "def f():\n    x = 1\n    if x:\n        pass\ny = 2\n";
        let tokens = kinds(source);
        let indents = tokens.iter().filter(|k| **k == TokenKind::Indent).count();
        let dedents = tokens.iter().filter(|k| **k == TokenKind::Dedent).count();
        assert_eq!(indents, 2);
        assert_eq!(dedents, 2);
        assert_eq!(tokens.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let source = "# pragma version ~=0.4.0\n\n\n    # indented comment\nx: uint256\n";
        let tokens = tokenize(source).unwrap();
        assert_eq!(tokens[0].text, "x");
        assert_eq!(tokens[0].span, Span::new(5, 1));
        assert!(!tokens.iter().any(|t| t.kind == TokenKind::Indent));
    }

    #[test]
    fn test_newlines_inside_brackets_are_ignored() {
        let source = "x = f(\n    a,\n    b,\n)\n";
        let newlines = kinds(source)
            .into_iter()
            .filter(|k| *k == TokenKind::Newline)
            .count();
        assert_eq!(newlines, 1);
    }

    #[test]
    fn test_longest_punctuation_wins() {
        let tokens = tokenize("a **= b // c -> d\n").unwrap();
        let puncts: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Punct)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(puncts, vec!["**=", "//", "->"]);
    }

    #[test]
    fn test_triple_quoted_docstring_spans_lines() {
        let tokens = tokenize("\"\"\"\nline one\nline two\n\"\"\"\nx = 1\n").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert!(tokens[0].text.contains("line two"));
        assert_eq!(tokens[2].text, "x");
    }

    #[test]
    fn test_numbers_and_attribute_dots() {
        let tokens = tokenize("x = 10**18 + 0xff + 1.5 + a[1].b\n").unwrap();
        let numbers: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Number)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(numbers, vec!["10", "18", "0xff", "1.5", "1"]);
    }

    #[test]
    fn test_inconsistent_dedent_is_an_error() {
        let err = tokenize("def f():\n        x = 1\n    y = 2\n").unwrap_err();
        assert!(err.message.contains("unindent"));
        assert_eq!(err.span.line, 3);
    }
}
