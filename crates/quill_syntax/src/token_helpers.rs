//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites and to make it easy
//! to work with ID-based tokens.

use crate::lexer::{Token, TokenKind};
use quill_core::lang::keywords::KeywordId;
use quill_core::lang::punctuation::PunctuationId;

impl TokenKind {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return the operator spelling, if this is an operator token.
    pub fn operator(&self) -> Option<&str> {
        match self {
            TokenKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    /// Return `true` if this is the given operator spelling.
    pub fn is_operator(&self, spelling: &str) -> bool {
        matches!(self, TokenKind::Operator(o) if o == spelling)
    }

    /// Return the punctuation id, if this is a punctuation token.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return `true` if this token ends a top-level declaration.
    pub fn is_boundary(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Eof)
    }

    /// Return `true` if this token can start an application argument.
    pub fn starts_atom(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::UpperIdent(_)
                | TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::String(_)
                | TokenKind::Punctuation(PunctuationId::LParen)
                | TokenKind::Punctuation(PunctuationId::LBracket)
        )
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.keyword_id()`.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    /// Convenience wrapper for `self.kind.operator()`.
    pub fn operator(&self) -> Option<&str> {
        self.kind.operator()
    }

    /// Convenience wrapper for `self.kind.punctuation_id()`.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        self.kind.punctuation_id()
    }
}
