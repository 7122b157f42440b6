//! Define the reserved keyword vocabulary for the Quill language.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) that records canonical spellings and categories.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - This registry is intentionally **pure** (no AST/IO/side effects).
//!
//! ## Examples
//! ```rust
//! use quill_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("if"), Some(KeywordId::If));
//! assert_eq!(keywords::as_str(KeywordId::If), "if");
//! ```

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Module header / imports
    Module,
    Exposing,
    Import,
    As,

    // Fixity declarations
    Infix,
    Infixl,
    Infixr,

    // Expressions
    If,
    Then,
    Else,
    Let,
    In,
}

/// Broad grouping used for docs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Header,
    Fixity,
    Expression,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
}

/// Registry of all keywords.
///
/// ## Notes
/// - The ordering is not semantically meaningful, but is grouped for readability.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Module header / imports
    info(KeywordId::Module, "module", KeywordCategory::Header),
    info(KeywordId::Exposing, "exposing", KeywordCategory::Header),
    info(KeywordId::Import, "import", KeywordCategory::Header),
    info(KeywordId::As, "as", KeywordCategory::Header),
    // Fixity declarations
    info(KeywordId::Infix, "infix", KeywordCategory::Fixity),
    info(KeywordId::Infixl, "infixl", KeywordCategory::Fixity),
    info(KeywordId::Infixr, "infixr", KeywordCategory::Fixity),
    // Expressions
    info(KeywordId::If, "if", KeywordCategory::Expression),
    info(KeywordId::Then, "then", KeywordCategory::Expression),
    info(KeywordId::Else, "else", KeywordCategory::Expression),
    info(KeywordId::Let, "let", KeywordCategory::Expression),
    info(KeywordId::In, "in", KeywordCategory::Expression),
];

/// Canonical spelling.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS.iter().find(|k| k.id == id).expect("keyword info missing")
}

/// Lookup by spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling is reserved.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo { id, canonical, category }
}
