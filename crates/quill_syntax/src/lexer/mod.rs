//! Lexer for the Quill programming language
//!
//! Handles tokenization including:
//! - Keywords (module, exposing, import, infixl, let, if, etc.)
//! - Identifiers, including dotted qualified names (`Math.square`, `Math.Vector`)
//! - Int, float and string literals
//! - Operator symbol runs and the reserved symbols `=`, `:`, `->`, `..`
//! - `--` line comments and nested `{- -}` block comments
//! - Layout: a `Newline` token before every token that starts in column 0
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)

pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::CompileError;
use quill_core::lang::operators::is_operator_char;
use quill_core::lang::punctuation::{self, PunctuationId};

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Top-level declarations are delimited by layout alone: anything that starts in
// column 0 begins a new declaration, everything indented continues the previous
// one. The lexer turns that into an explicit `Newline` token so the parser never
// has to look at columns.
// ============================================================================

/// Lexer for Quill source code.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    /// Open parens/brackets, used to report unmatched closers.
    bracket_depth: usize,
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            bracket_depth: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source code, recovering from errors.
    ///
    /// The token stream always ends with an `Eof` token, even when errors were reported; characters that could not
    /// be scanned are skipped.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<CompileError>) {
        while !self.is_at_end() {
            self.scan_token();
        }

        self.tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(self.current_pos, self.current_pos),
        ));

        (self.tokens, self.errors)
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&mut self, message: impl Into<String>, start: usize) {
        self.errors
            .push(CompileError::syntax(message, Span::new(start, self.current_pos)));
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.current_pos;

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            ' ' | '\t' | '\r' | '\n' => {}

            // Comments
            '-' if self.peek() == Some('-') => self.skip_line_comment(),
            '{' if self.peek() == Some('-') => self.skip_block_comment(start),

            // Punctuation
            ',' => self.add_punct(PunctuationId::Comma, start),
            '\\' => self.add_punct(PunctuationId::Backslash, start),
            '(' => self.open_bracket(PunctuationId::LParen, start),
            ')' => self.close_bracket(PunctuationId::RParen, start),
            '[' => self.open_bracket(PunctuationId::LBracket, start),
            ']' => self.close_bracket(PunctuationId::RBracket, start),

            // Literals
            '"' => self.scan_string(start),
            '0'..='9' => self.scan_number(start),

            // Operators and reserved symbols
            _ if is_operator_char(c) => self.scan_operator(start),

            // Identifiers and keywords
            _ if is_ident_start(c) => self.scan_identifier(start),

            _ => self.error(format!("Unexpected character '{}'", c), start),
        }
    }

    /// Push a token, preceded by `Newline` if it starts in column 0.
    fn add_token(&mut self, kind: TokenKind, start: usize) {
        let column_zero = start == 0 || self.source[..start].ends_with('\n');
        if column_zero && !self.tokens.is_empty() {
            self.tokens.push(Token::new(TokenKind::Newline, Span::new(start, start)));
        }
        self.tokens.push(Token::new(kind, Span::new(start, self.current_pos)));
    }

    fn add_punct(&mut self, id: PunctuationId, start: usize) {
        self.add_token(TokenKind::Punctuation(id), start);
    }

    fn open_bracket(&mut self, kind: PunctuationId, start: usize) {
        self.bracket_depth += 1;
        self.add_punct(kind, start);
    }

    /// Produces an error if there's no matching opening bracket.
    fn close_bracket(&mut self, kind: PunctuationId, start: usize) {
        if self.bracket_depth == 0 {
            self.error("Unmatched closing bracket", start);
        } else {
            self.bracket_depth -= 1;
        }
        self.add_punct(kind, start);
    }

    // ========================================================================
    // Comments
    // ========================================================================

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// `{- ... -}`, nesting allowed. The opening `{` is already consumed.
    fn skip_block_comment(&mut self, start: usize) {
        self.advance();
        let mut depth = 1;
        while depth > 0 {
            match self.advance() {
                Some('{') if self.match_char('-') => depth += 1,
                Some('-') if self.match_char('}') => depth -= 1,
                Some(_) => {}
                None => {
                    self.error("Unterminated block comment", start);
                    return;
                }
            }
        }
    }

    // ========================================================================
    // Literals
    // ========================================================================

    fn scan_string(&mut self, start: usize) {
        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.error("Unterminated string literal", start);
                    return;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let escape_start = self.current_pos - 1;
                    match self.advance() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),
                        Some(other) => self.error(format!("Unknown escape sequence '\\{}'", other), escape_start),
                        None => {}
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }
        self.add_token(TokenKind::String(value), start);
    }

    fn scan_number(&mut self, start: usize) {
        while matches!(self.peek(), Some('0'..='9' | '_')) {
            self.advance();
        }

        // `1..2` is a range token run, not a float.
        let is_float = self.peek() == Some('.') && matches!(self.peek_next(), Some('0'..='9'));
        if is_float {
            self.advance();
            while matches!(self.peek(), Some('0'..='9' | '_')) {
                self.advance();
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                self.advance();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                while matches!(self.peek(), Some('0'..='9')) {
                    self.advance();
                }
            }
        }

        let text: String = self.source[start..self.current_pos].chars().filter(|c| *c != '_').collect();
        if is_float {
            match text.parse::<f64>() {
                Ok(value) => self.add_token(TokenKind::Float(value), start),
                Err(_) => self.error(format!("Invalid float literal '{}'", text), start),
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => self.add_token(TokenKind::Int(value), start),
                Err(_) => self.error(format!("Integer literal '{}' is out of range", text), start),
            }
        }
    }

    // ========================================================================
    // Operators
    // ========================================================================

    fn scan_operator(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if !is_operator_char(c) {
                break;
            }
            // `--` inside a run still starts a comment.
            if c == '-' && self.peek_next() == Some('-') {
                break;
            }
            self.advance();
        }

        let spelling = &self.source[start..self.current_pos];
        match punctuation::reserved_symbol(spelling) {
            Some(id) => self.add_punct(id, start),
            None => self.add_token(TokenKind::Operator(spelling.to_string()), start),
        }
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    /// Scan `name`, `Name`, or a dotted path of capitalized segments ending in either (`Math.Vector.add`).
    fn scan_identifier(&mut self, start: usize) {
        let mut segment_start = start;
        loop {
            while let Some(c) = self.peek() {
                if is_ident_continue(c) {
                    self.advance();
                } else {
                    break;
                }
            }

            let segment_is_upper = self.source[segment_start..].starts_with(|c: char| c.is_ascii_uppercase());
            let continues = segment_is_upper
                && self.peek() == Some('.')
                && self.peek_next().is_some_and(|c| c.is_ascii_alphabetic());
            if !continues {
                break;
            }
            self.advance();
            segment_start = self.current_pos;
            self.advance();
        }

        let spelling = &self.source[start..self.current_pos];
        let last_segment = &self.source[segment_start..self.current_pos];

        // Look up identifier spelling in the reserved-word registry (no allocation for keywords).
        if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start);
        } else if last_segment.starts_with(|c: char| c.is_ascii_uppercase()) {
            self.add_token(TokenKind::UpperIdent(spelling.to_string()), start);
        } else {
            self.add_token(TokenKind::Ident(spelling.to_string()), start);
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '\''
}

/// Convenience function to lex a source string.
///
/// Fails with every lexical error if there was at least one; use [`lex_recovering`] to keep the tokens anyway.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<CompileError>> {
    let (tokens, errors) = Lexer::new(source).tokenize();
    if errors.is_empty() { Ok(tokens) } else { Err(errors) }
}

/// Lex a source string, returning the recovered token stream along with any errors.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex_recovering(source: &str) -> (Vec<Token>, Vec<CompileError>) {
    Lexer::new(source).tokenize()
}
