//! Built-in operator vocabulary.
//!
//! This module defines the operators every Quill module can use without declaring or importing them, together with
//! their fixity (precedence + associativity).
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - `precedence` ranges over `0..=`[`MAX_PRECEDENCE`]; higher binds tighter.
//! - User-defined operators share the same [`Associativity`] type but are registered per module at parse time.
//!
//! ## Examples
//! ```rust
//! use quill_core::lang::operators::{self, Associativity, OperatorId};
//!
//! assert_eq!(operators::from_str("|>"), Some(OperatorId::PipeRight));
//! assert_eq!(operators::info_for(OperatorId::Plus).precedence, 6);
//! assert_eq!(operators::info_for(OperatorId::Pow).associativity, Associativity::Right);
//! ```

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    None,
}

impl Associativity {
    /// The keyword that declares this associativity (`infixl`, `infixr`, `infix`).
    pub fn keyword(self) -> &'static str {
        match self {
            Associativity::Left => "infixl",
            Associativity::Right => "infixr",
            Associativity::None => "infix",
        }
    }
}

impl std::fmt::Display for Associativity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Associativity::Left => write!(f, "left-associative"),
            Associativity::Right => write!(f, "right-associative"),
            Associativity::None => write!(f, "non-associative"),
        }
    }
}

/// Highest precedence a fixity declaration may use.
pub const MAX_PRECEDENCE: u8 = 9;

/// Fixity applied to an operator nobody declared, when the parser runs leniently.
pub const DEFAULT_ASSOCIATIVITY: Associativity = Associativity::Left;

/// Precedence applied to an operator nobody declared, when the parser runs leniently.
pub const DEFAULT_PRECEDENCE: u8 = 9;

/// Stable identifier for every built-in operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Function application
    PipeLeft,
    PipeRight,

    // Boolean
    Or,
    And,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Appending
    Append,
    Cons,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash,
    Percent,
    Pow,

    // Composition
    ComposeLeft,
    ComposeRight,
}

/// Metadata for a built-in operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
}

/// Registry of all built-in operators.
pub const OPERATORS: &[OperatorInfo] = &[
    // Function application
    op(OperatorId::PipeLeft, "<|", 0, Associativity::Right),
    op(OperatorId::PipeRight, "|>", 0, Associativity::Left),
    // Boolean
    op(OperatorId::Or, "||", 2, Associativity::Right),
    op(OperatorId::And, "&&", 3, Associativity::Right),
    // Comparison
    op(OperatorId::EqEq, "==", 4, Associativity::None),
    op(OperatorId::NotEq, "/=", 4, Associativity::None),
    op(OperatorId::Lt, "<", 4, Associativity::None),
    op(OperatorId::Gt, ">", 4, Associativity::None),
    op(OperatorId::LtEq, "<=", 4, Associativity::None),
    op(OperatorId::GtEq, ">=", 4, Associativity::None),
    // Appending
    op(OperatorId::Append, "++", 5, Associativity::Right),
    op(OperatorId::Cons, "::", 5, Associativity::Right),
    // Arithmetic
    op(OperatorId::Plus, "+", 6, Associativity::Left),
    op(OperatorId::Minus, "-", 6, Associativity::Left),
    op(OperatorId::Star, "*", 7, Associativity::Left),
    op(OperatorId::Slash, "/", 7, Associativity::Left),
    op(OperatorId::SlashSlash, "//", 7, Associativity::Left),
    op(OperatorId::Percent, "%", 7, Associativity::Left),
    op(OperatorId::Pow, "^", 8, Associativity::Right),
    // Composition
    op(OperatorId::ComposeLeft, "<<", 9, Associativity::Left),
    op(OperatorId::ComposeRight, ">>", 9, Associativity::Right),
];

/// Return the full metadata entry for an operator.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS.iter().find(|o| o.id == id).expect("operator info missing")
}

/// Resolve an operator spelling to its built-in identifier.
///
/// ## Returns
/// - `Some(OperatorId)` if the spelling is a built-in operator.
/// - `None` otherwise (the operator may still be user-defined).
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

/// Return `true` if `c` may appear in an operator symbol.
pub fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '<' | '>' | '=' | '|' | '&' | '^' | '%' | '!' | '?' | ':' | '.' | '$' | '#' | '@' | '~'
    )
}

// --- helpers -----------------------------------------------------------------

const fn op(id: OperatorId, spelling: &'static str, precedence: u8, associativity: Associativity) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        associativity,
    }
}
