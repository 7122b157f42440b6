//! Parser for the Quill programming language
//!
//! Converts a token stream into a [`Module`]. Infix expressions are grouped with precedence climbing driven by a
//! [`FixityScope`], so the same token stream can parse differently depending on which operators the surrounding
//! package declares.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use quill_syntax::{lexer, parser};
//!
//! let source = "module Main exposing (..)\n\ninfixr 6 +%\n\n(+%) a b = a + b\n\nmain = 1 +% 2 +% 3\n";
//! let tokens = lexer::lex(source).unwrap();
//! let module = parser::parse(&tokens).unwrap();
//! assert_eq!(module.name(), Some("Main"));
//! ```

use crate::ast::*;
use crate::diagnostics::{CompileError, errors};
use crate::fixity::{Fixity, FixityScope, OperatorTable, UnknownOperatorPolicy};
use crate::lexer::{Token, TokenKind};
use quill_core::lang::keywords::KeywordId;
use quill_core::lang::operators::{Associativity, MAX_PRECEDENCE};
use quill_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/mode.rs");
include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
