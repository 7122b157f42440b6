//! Punctuation vocabulary.
//!
//! This module defines the canonical set of non-operator punctuation tokens used by the lexer/parser: delimiters,
//! separators and the few symbol spellings that are reserved by the grammar and therefore can never name a
//! user-defined operator.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Reserved symbol spellings (`=`, `:`, `->`, `..`) are scanned like operators and then reclassified by the lexer
//!   through [`reserved_symbol`].
//!
//! ## Examples
//! ```rust
//! use quill_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_str("->"), Some(PunctuationId::Arrow));
//! assert_eq!(punctuation::as_str(PunctuationId::Backslash), "\\");
//! ```

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Brackets.
    Delimiter,
    /// Separators like `,`.
    Separator,
    /// Symbol spellings reserved by the grammar (`=`, `:`, `->`, `..`).
    ReservedSymbol,
    /// Lambda marker `\`.
    Marker,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    Comma,
    Eq,
    Colon,
    Arrow,
    DotDot,
    Backslash,
    LParen,
    RParen,
    LBracket,
    RBracket,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: &'static str,
    pub category: PunctuationCategory,
}

/// Registry of all punctuation tokens.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    info(PunctuationId::Comma, ",", PunctuationCategory::Separator),
    info(PunctuationId::Eq, "=", PunctuationCategory::ReservedSymbol),
    info(PunctuationId::Colon, ":", PunctuationCategory::ReservedSymbol),
    info(PunctuationId::Arrow, "->", PunctuationCategory::ReservedSymbol),
    info(PunctuationId::DotDot, "..", PunctuationCategory::ReservedSymbol),
    info(PunctuationId::Backslash, "\\", PunctuationCategory::Marker),
    info(PunctuationId::LParen, "(", PunctuationCategory::Delimiter),
    info(PunctuationId::RParen, ")", PunctuationCategory::Delimiter),
    info(PunctuationId::LBracket, "[", PunctuationCategory::Delimiter),
    info(PunctuationId::RBracket, "]", PunctuationCategory::Delimiter),
];

/// Canonical spelling.
pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: PunctuationId) -> PunctuationCategory {
    info_for(id).category
}

/// Full metadata.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION.iter().find(|p| p.id == id).expect("punctuation info missing")
}

/// Lookup by spelling.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == s).map(|p| p.id)
}

/// Return the punctuation id if an operator-character run is one of the grammar's reserved symbols.
pub fn reserved_symbol(spelling: &str) -> Option<PunctuationId> {
    from_str(spelling).filter(|id| category(*id) == PunctuationCategory::ReservedSymbol)
}

// --- helpers -----------------------------------------------------------------

const fn info(id: PunctuationId, canonical: &'static str, category: PunctuationCategory) -> PunctuationInfo {
    PunctuationInfo { id, canonical, category }
}
