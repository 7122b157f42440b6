//! Token types for the Quill lexer.
//!
//! The lexer uses **registry-backed IDs** for fixed vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Punctuation(PunctuationId)` for delimiters and reserved symbols
//!
//! ## Notes
//! - Operators stay stringly-typed (`Operator(String)`): any run of operator characters is a valid operator name,
//!   and its fixity is only known once the operator table has been built.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use crate::ast::Span;
use quill_core::lang::keywords::{self, KeywordId};
use quill_core::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Punctuation(PunctuationId),

    // ========== Operators ==========
    Operator(String),

    // ========== Identifiers and Literals ==========
    /// Lower-case identifier, possibly qualified (`Math.square`).
    Ident(String),
    /// Capitalized identifier, possibly qualified (`Math.Vector`).
    UpperIdent(String),
    Int(i64),
    Float(f64),
    String(String),

    // ========== Layout ==========
    /// Emitted before a token that starts in column 0.
    Newline,

    // ========== Special ==========
    Eof,
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Keyword(id) => write!(f, "keyword '{}'", keywords::as_str(*id)),
            TokenKind::Punctuation(id) => write!(f, "'{}'", quill_core::lang::punctuation::as_str(*id)),
            TokenKind::Operator(op) => write!(f, "operator '{}'", op),
            TokenKind::Ident(name) | TokenKind::UpperIdent(name) => write!(f, "'{}'", name),
            TokenKind::Int(n) => write!(f, "'{}'", n),
            TokenKind::Float(x) => write!(f, "'{}'", x),
            TokenKind::String(_) => write!(f, "string literal"),
            TokenKind::Newline => write!(f, "new declaration"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}
