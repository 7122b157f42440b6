//! Diagnostics for Quill
//!
//! Every problem the front-end finds becomes a [`CompileError`]: a message, a byte span, a [`ErrorKind`] saying
//! which stage produced it, and a [`Severity`]. Rendering lives in the `quill` crate; this module only describes.

use crate::ast::Span;

/// A compile-time error with location information
#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub severity: Severity,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            kind,
            severity: Severity::Error,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Syntax, message, span)
    }

    pub fn fixity(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Fixity, message, span)
    }

    pub fn warning(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::new(kind, message, span)
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.kind, self.message)
    }
}

impl std::error::Error for CompileError {}

/// Stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Fixity,
    CircularDependency,
    MissingModule,
    Io,
    Manifest,
    ModuleName,
    Resolution,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "syntax"),
            ErrorKind::Fixity => write!(f, "fixity"),
            ErrorKind::CircularDependency => write!(f, "circular dependency"),
            ErrorKind::MissingModule => write!(f, "missing module"),
            ErrorKind::Io => write!(f, "io"),
            ErrorKind::Manifest => write!(f, "manifest"),
            ErrorKind::ModuleName => write!(f, "module name"),
            ErrorKind::Resolution => write!(f, "resolution"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Get 1-based line and column numbers for a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let mut line_num = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line_num += 1;
            line_start = i + 1;
        }
    }

    (line_num, offset - line_start + 1)
}

// ============================================================================
// Error catalog
// ============================================================================

/// Constructors for the diagnostics the front-end reports more than once.
pub mod errors {
    use super::*;
    use quill_core::lang::operators::{Associativity, DEFAULT_PRECEDENCE};

    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> CompileError {
        CompileError::syntax(format!("Expected {}, found {}", expected, found), span)
    }

    pub fn nesting_too_deep(limit: usize, span: Span) -> CompileError {
        CompileError::syntax(format!("Expression is nested more than {} levels deep", limit), span)
    }

    pub fn unknown_operator(op: &str, span: Span) -> CompileError {
        CompileError::fixity(format!("Unknown operator '{}'", op), span)
            .with_hint(format!("Declare it with `infixl 6 {}` and expose it from its module", op))
    }

    pub fn unknown_operator_defaulted(op: &str, span: Span) -> CompileError {
        CompileError::warning(
            ErrorKind::Fixity,
            format!("Operator '{}' has no known fixity", op),
            span,
        )
        .with_note(format!(
            "assuming infixl {} until the defining module is parsed",
            DEFAULT_PRECEDENCE
        ))
    }

    pub fn non_associative_chain(op: &str, previous: &str, span: Span) -> CompileError {
        CompileError::fixity(
            format!("Cannot chain non-associative operator '{}' after '{}'", op, previous),
            span,
        )
        .with_hint("Add parentheses to make the grouping explicit")
    }

    pub fn mixed_associativity(
        op: &str,
        assoc: Associativity,
        previous: &str,
        previous_assoc: Associativity,
        precedence: u8,
        span: Span,
    ) -> CompileError {
        CompileError::fixity(
            format!(
                "Cannot mix {} '{}' and {} '{}' at precedence {}",
                previous_assoc, previous, assoc, op, precedence
            ),
            span,
        )
        .with_hint("Add parentheses to make the grouping explicit")
    }

    pub fn circular_dependency(first: &str, second: &str, span: Span) -> CompileError {
        let message = if first == second {
            format!("Module '{}' imports itself", first)
        } else {
            format!("Circular dependency between modules '{}' and '{}'", first, second)
        };
        CompileError::new(ErrorKind::CircularDependency, message, span)
    }

    pub fn missing_module(name: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::MissingModule,
            format!("Cannot find module '{}'", name),
            span,
        )
        .with_hint("Check the module name and the package's source directories")
    }

    pub fn io(path: &str, err: &std::io::Error) -> CompileError {
        CompileError::new(ErrorKind::Io, format!("Cannot read '{}': {}", path, err), Span::default())
    }

    pub fn module_name_mismatch(declared: &str, expected: &str, span: Span) -> CompileError {
        CompileError::new(
            ErrorKind::ModuleName,
            format!("Module is declared as '{}' but its file says '{}'", declared, expected),
            span,
        )
    }

    pub fn unbound_name(name: &str, span: Span) -> CompileError {
        CompileError::new(ErrorKind::Resolution, format!("Unknown name '{}'", name), span)
            .with_hint("Did you forget to define or import it?")
    }

    pub fn internal(message: impl Into<String>) -> CompileError {
        CompileError::new(ErrorKind::Internal, message, Span::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_counts_from_one() {
        let src = "module A exposing (..)\nx = 1\n";
        assert_eq!(line_col(src, 0), (1, 1));
        assert_eq!(line_col(src, 23), (2, 1));
        assert_eq!(line_col(src, 27), (2, 5));
    }

    #[test]
    fn self_cycle_reads_as_self_import() {
        let err = errors::circular_dependency("A", "A", Span::default());
        assert_eq!(err.message, "Module 'A' imports itself");
        assert_eq!(err.kind, ErrorKind::CircularDependency);
    }

    #[test]
    fn defaulted_operator_is_a_warning() {
        let err = errors::unknown_operator_defaulted("+%", Span::new(4, 6));
        assert!(err.is_warning());
        assert!(!err.is_error());
    }
}
