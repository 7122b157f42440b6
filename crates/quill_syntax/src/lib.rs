//! Shared syntax frontend for the Quill language: lexer, AST, operator table, parser, diagnostics.
//!
//! This crate is dependency-light and intended for reuse across the compiler front-end and tooling.
//!
//! ## Notes
//! - This crate is intentionally “syntax-only”: it parses one module at a time. Walking imports, ordering modules
//!   and resolving names across a package belongs to the `quill` crate.
//! - Infix expressions are shaped by a [`fixity::FrozenOperatorTable`]; the parser never guesses precedence for
//!   user-defined operators on its own.
//!
//! ## Examples
//! ```rust,no_run
//! use quill_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("module Main exposing (..)\n\nmain = 1 + 2\n").unwrap();
//! let module = parser::parse(&tokens).unwrap();
//! assert_eq!(module.declarations.len(), 1);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod fixity;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
