//! Quill language vocabulary registries.
//!
//! This module is the “front door” for language-level vocabulary: reserved keywords, built-in operators,
//! punctuation and prelude names.
//!
//! Callers work with **stable IDs** (e.g. `KeywordId`, `OperatorId`) and look up spellings/metadata via registry
//! tables instead of scattering string comparisons across the compiler.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - User-defined operators are not registered here; they live in the per-session operator table of
//!   `quill_syntax::fixity`.
//!
//! ## Examples
//! ```rust
//! use quill_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("infixl"), Some(KeywordId::Infixl));
//! assert_eq!(keywords::as_str(KeywordId::Exposing), "exposing");
//! ```

pub mod keywords;
pub mod operators;
pub mod prelude;
pub mod punctuation;
