#![forbid(unsafe_code)]
//! Quill Programming Language Frontend
//!
//! Quill is a small ML-family language with user-definable infix operators. This crate turns an entry module into a
//! fully parsed, dependency-ordered package: it discovers every imported module, collects operator fixities across
//! module boundaries, orders modules by their imports, parses expression bodies against the collected fixities and
//! checks names.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use quill::{ParseMode, parse};
//!
//! let package = parse("src/Main.quill", ParseMode::FULL_PARSE).unwrap();
//! for (name, module) in package.iter() {
//!     println!("{name}: {} declarations", module.declarations.len());
//! }
//! ```
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Aborting a parse**: fatal conditions are reported to the session and then propagated as
//!   [`frontend::session::Bailout`]; nothing in the parse pipeline panics to abort.

pub mod cli;
pub mod frontend;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::lexer;
pub use frontend::parser;

pub use frontend::orchestrator::{Package, ParseError, parse, parse_from, parse_with_loader};
pub use frontend::parser::ParseMode;
pub use frontend::session::{Diagnostic, DiagnosticReport};
