//! Provide the canonical language vocabulary shared by the Quill lexer, parser and front-end.
//!
//! This crate is intentionally small and dependency-light.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, and no compiler-specific types.
//! - Current scope: reserved keywords, punctuation, the built-in operator fixity table and the prelude names that are
//!   always in scope.

pub mod lang;
