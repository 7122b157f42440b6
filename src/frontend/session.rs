//! Diagnostics session threaded through both parse passes.
//!
//! A [`Session`] owns the [`CodeMap`] and the [`Reporter`]. Everything that goes wrong while parsing a package is
//! reported here; nothing is printed until [`Session::finish`], so diagnostics buffered before a [`Bailout`] are
//! still emitted.

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, SourceCode};
use quill_syntax::ast::Span;
use quill_syntax::diagnostics::{CompileError, ErrorKind, Severity};
use quill_syntax::parser::ParseMode;

use super::source::{CodeMap, SourceLoader};

/// Abort signal for the current parse.
///
/// Raised only after the cause has been reported to the session. Propagated with `?` and caught once, at the
/// outermost boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bailout;

pub type Fallible<T> = Result<T, Bailout>;

/// Where diagnostics go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    /// Render to stderr with miette's graphical handler.
    Stderr { colors: bool },
    /// Hand everything back to the caller in a [`DiagnosticReport`].
    Collect,
}

impl Sink {
    pub fn for_mode(mode: ParseMode) -> Self {
        if mode.is(ParseMode::STDERR_DIAGNOSTICS) {
            Sink::Stderr { colors: true }
        } else {
            Sink::Collect
        }
    }
}

// ============================================================================
// Diagnostic
// ============================================================================

/// A [`CompileError`] pinned to a file.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// File the span points into; `None` for package-level problems.
    pub path: Option<PathBuf>,
    /// 1-based line and column of the span start, when the file is known.
    pub position: Option<(usize, usize)>,
    pub error: CompileError,
    source: Option<Arc<str>>,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.error.severity
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind
    }

    pub fn message(&self) -> &str {
        &self.error.message
    }

    pub fn is_error(&self) -> bool {
        self.error.is_error()
    }

    fn key(&self) -> (Option<PathBuf>, Span, ErrorKind, String) {
        (self.path.clone(), self.error.span, self.error.kind, self.error.message.clone())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.path, self.position) {
            (Some(path), Some((line, col))) => write!(f, "{}:{}:{}: ", path.display(), line, col)?,
            (Some(path), None) => write!(f, "{}: ", path.display())?,
            (None, _) => {}
        }
        write!(f, "{}[{}]: {}", self.error.severity, self.error.kind, self.error.message)
    }
}

impl std::error::Error for Diagnostic {}

impl miette::Diagnostic for Diagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("quill::{}", self.error.kind).replace(' ', "_")))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.error.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let lines: Vec<String> = self
            .error
            .notes
            .iter()
            .map(|n| format!("note: {n}"))
            .chain(self.error.hints.iter().cloned())
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(Box::new(lines.join("\n")))
        }
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.source.as_ref().map(|s| s as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let source = self.source.as_ref()?;
        let span = self.error.span;
        let start = span.start.min(source.len());
        let len = span.end.saturating_sub(span.start).min(source.len() - start);
        Some(Box::new(std::iter::once(LabeledSpan::new(None, start, len))))
    }
}

/// Everything a failed parse reported, in report order.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticReport {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DiagnosticReport {}

impl miette::Diagnostic for DiagnosticReport {
    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn miette::Diagnostic> + 'a>> {
        Some(Box::new(self.diagnostics.iter().map(|d| d as &dyn miette::Diagnostic)))
    }
}

// ============================================================================
// Reporter
// ============================================================================

/// Ordered, de-duplicated diagnostic buffer.
///
/// Discovery and completion lex and parse the same files, so the same problem can be reported twice; only the first
/// report is kept.
#[derive(Debug)]
pub struct Reporter {
    sink: Sink,
    skip_warnings: bool,
    diagnostics: Vec<Diagnostic>,
    seen: HashSet<(Option<PathBuf>, Span, ErrorKind, String)>,
}

impl Reporter {
    pub fn new(sink: Sink, skip_warnings: bool) -> Self {
        Self {
            sink,
            skip_warnings,
            diagnostics: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn sink(&self) -> Sink {
        self.sink
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        if self.skip_warnings && diagnostic.severity() == Severity::Warning {
            return;
        }
        if !self.seen.insert(diagnostic.key()) {
            return;
        }
        match diagnostic.severity() {
            Severity::Error => tracing::debug!(%diagnostic, "reported error"),
            Severity::Warning => tracing::debug!(%diagnostic, "reported warning"),
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

// ============================================================================
// Session
// ============================================================================

/// State shared by the passes of one parse invocation.
#[derive(Debug)]
pub struct Session {
    pub code_map: CodeMap,
    pub reporter: Reporter,
}

/// What is left of a session once it is finished.
#[derive(Debug)]
pub struct Finished {
    pub sink: Sink,
    pub report: DiagnosticReport,
}

impl Finished {
    pub fn error_count(&self) -> usize {
        self.report.errors().count()
    }
}

impl Session {
    pub fn new(mode: ParseMode, loader: Box<dyn SourceLoader>) -> Self {
        Self::with_sink(Sink::for_mode(mode), mode.is(ParseMode::SKIP_WARNINGS), loader)
    }

    pub fn with_sink(sink: Sink, skip_warnings: bool, loader: Box<dyn SourceLoader>) -> Self {
        Self {
            code_map: CodeMap::new(loader),
            reporter: Reporter::new(sink, skip_warnings),
        }
    }

    /// Read `path` through the code map.
    pub fn load(&mut self, path: &Path) -> io::Result<Arc<str>> {
        self.code_map.load(path)
    }

    /// Report a problem located in `path` (or nowhere in particular).
    pub fn report(&mut self, path: Option<&Path>, error: CompileError) {
        let source = path.and_then(|p| self.code_map.get(p));
        let position = source
            .as_ref()
            .map(|s| quill_syntax::diagnostics::line_col(s, error.span.start));
        self.reporter.report(Diagnostic {
            path: path.map(Path::to_path_buf),
            position,
            error,
            source,
        });
    }

    pub fn report_all(&mut self, path: Option<&Path>, errors: impl IntoIterator<Item = CompileError>) {
        for error in errors {
            self.report(path, error);
        }
    }

    /// Report a fatal problem and return the signal to unwind with.
    pub fn bail(&mut self, path: Option<&Path>, error: CompileError) -> Bailout {
        tracing::warn!(message = %error.message, "aborting parse");
        self.report(path, error);
        Bailout
    }

    /// Emit buffered diagnostics (stderr sink) and hand back the report.
    pub fn finish(self) -> Finished {
        let sink = self.reporter.sink;
        let report = DiagnosticReport {
            diagnostics: self.reporter.diagnostics,
        };
        if let Sink::Stderr { colors } = sink {
            let theme = if colors {
                GraphicalTheme::unicode()
            } else {
                GraphicalTheme::unicode_nocolor()
            };
            let handler = GraphicalReportHandler::new_themed(theme);
            for diagnostic in &report.diagnostics {
                eprintln!("{}", render(&handler, diagnostic));
            }
        }
        Finished { sink, report }
    }
}

/// Render one diagnostic with miette, falling back to the one-line form.
pub fn render(handler: &GraphicalReportHandler, diagnostic: &Diagnostic) -> String {
    let mut out = String::new();
    if let Some(path) = &diagnostic.path {
        out.push_str(&format!("{}\n", path.display()));
    }
    match handler.render_report(&mut out, diagnostic) {
        Ok(()) => out,
        Err(_) => diagnostic.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::source::MemLoader;
    use quill_syntax::diagnostics::errors;

    fn session(mode: ParseMode) -> Session {
        let loader = MemLoader::new().with_file("A.quill", "module A exposing (..)\n\nx = y\n");
        Session::new(mode, Box::new(loader))
    }

    #[test]
    fn identical_reports_are_deduplicated() {
        let mut session = session(ParseMode::FULL_PARSE);
        session.load(Path::new("A.quill")).unwrap();
        let err = errors::unbound_name("y", Span::new(28, 29));
        session.report(Some(Path::new("A.quill")), err.clone());
        session.report(Some(Path::new("A.quill")), err.clone());
        session.report(None, err);
        assert_eq!(session.reporter.diagnostics().len(), 2);
        assert_eq!(session.reporter.error_count(), 2);
    }

    #[test]
    fn warnings_are_dropped_when_skipped() {
        let mut session = session(ParseMode::SKIP_WARNINGS);
        session.report(None, errors::unknown_operator_defaulted("+%", Span::default()));
        assert!(session.reporter.diagnostics().is_empty());

        let mut session = self::session(ParseMode::FULL_PARSE);
        session.report(None, errors::unknown_operator_defaulted("+%", Span::default()));
        assert_eq!(session.reporter.diagnostics().len(), 1);
        assert!(!session.reporter.has_errors());
    }

    #[test]
    fn positions_come_from_the_code_map() {
        let mut session = session(ParseMode::FULL_PARSE);
        session.load(Path::new("A.quill")).unwrap();
        session.report(Some(Path::new("A.quill")), errors::unbound_name("y", Span::new(28, 29)));
        let finished = session.finish();
        let line = finished.report.to_string();
        assert_eq!(line, "A.quill:3:5: error[resolution]: Unknown name 'y'");
    }

    #[test]
    fn sink_follows_mode() {
        assert_eq!(Sink::for_mode(ParseMode::FULL_PARSE), Sink::Collect);
        assert_eq!(
            Sink::for_mode(ParseMode::STDERR_DIAGNOSTICS),
            Sink::Stderr { colors: true }
        );
    }

    #[test]
    fn graphical_render_mentions_message() {
        let mut session = session(ParseMode::FULL_PARSE);
        session.load(Path::new("A.quill")).unwrap();
        session.report(Some(Path::new("A.quill")), errors::unbound_name("y", Span::new(28, 29)));
        let finished = session.finish();
        let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
        let rendered = render(&handler, &finished.report.diagnostics[0]);
        assert!(rendered.contains("Unknown name 'y'"), "{rendered}");
        assert!(rendered.contains("A.quill"));
    }
}
