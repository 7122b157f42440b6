//! Quill Compiler Frontend
//!
//! This module contains the package-level frontend:
//! - `source`: source cache and loaders
//! - `session`: diagnostics reporting and the abort signal
//! - `package`: `quill.json` manifests and module lookup
//! - `graph`: module dependency graph
//! - `orchestrator`: two-pass package parsing
//! - `resolver`: name resolution over a parsed package

// Syntax components are provided by the shared quill_syntax crate.
pub use quill_syntax::{ast, diagnostics, fixity, lexer, parser};

pub mod graph;
pub mod orchestrator;
pub mod package;
pub mod resolver;
pub mod session;
pub mod source;
