//! Package parsing: discovery, ordering and completion.
//!
//! Operator fixities are declared per module and may be imported, so an expression body cannot be parsed until every
//! module it can see has been read. Parsing a package therefore takes two passes:
//!
//! 1. **Discovery** parses each reachable module in `SKIP_DEFINITIONS` mode (header, imports, fixity declarations),
//!    registers its operators in the [`OperatorTable`] and its imports in the [`DependencyGraph`], and recurses into
//!    imports it has not seen yet.
//! 2. **Completion** parses every module in full, in dependency order, against the frozen table.
//!
//! The semantic [`resolver`](super::resolver) then checks the finished [`Package`].

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};

use quill_syntax::ast::{Exposing, Module, Span};
use quill_syntax::diagnostics::{CompileError, ErrorKind, errors};
use quill_syntax::fixity::{FrozenOperatorTable, OperatorTable};
use quill_syntax::lexer;
use quill_syntax::parser::{self, ParseMode};
use thiserror::Error;

use super::graph::DependencyGraph;
use super::package::{FindModuleError, ManifestError, Project, is_native, normalize};
use super::resolver;
use super::session::{Bailout, DiagnosticReport, Fallible, Session, Sink};
use super::source::{FsLoader, MemLoader, SourceLoader};

/// Every module reachable from an entry file, fully parsed.
#[derive(Debug, Clone)]
pub struct Package {
    /// The module named on the command line.
    pub entry: String,
    /// Dependency order: every module appears after everything it imports.
    pub order: Vec<String>,
    pub modules: HashMap<String, Module>,
    pub paths: HashMap<String, PathBuf>,
}

impl Package {
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn path(&self, name: &str) -> Option<&Path> {
        self.paths.get(name).map(PathBuf::as_path)
    }

    /// Modules in dependency order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Module)> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.modules.get(name).map(|module| (name.as_str(), module)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Why a parse produced nothing.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum ParseError {
    /// Diagnostics were collected instead of printed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Diagnostics(DiagnosticReport),

    /// Diagnostics were already written to stderr.
    #[error("parsing failed with {errors} error(s)")]
    #[diagnostic(code(quill::parse_failed))]
    Reported { errors: usize },

    #[error("parsing did not produce a package")]
    #[diagnostic(code(quill::unresolved))]
    Unresolved,
}

impl ParseError {
    /// Collected diagnostics, when the parse used the collecting sink.
    pub fn report(&self) -> Option<&DiagnosticReport> {
        match self {
            ParseError::Diagnostics(report) => Some(report),
            ParseError::Reported { .. } | ParseError::Unresolved => None,
        }
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse the package rooted at the module in `path`, reading from the filesystem.
///
/// ## Errors
/// See [`ParseError`]. With the collecting sink, any surviving diagnostic (warnings included unless
/// `SKIP_WARNINGS`) fails the parse; with `STDERR_DIAGNOSTICS`, only errors do.
pub fn parse(path: impl AsRef<Path>, mode: ParseMode) -> Result<Package, ParseError> {
    parse_with_loader(path.as_ref(), mode, Box::new(FsLoader))
}

/// [`parse`] with sources and manifests read through `loader`.
#[tracing::instrument(skip_all, fields(path = %path.display(), mode = mode.bits()))]
pub fn parse_with_loader(path: &Path, mode: ParseMode, loader: Box<dyn SourceLoader>) -> Result<Package, ParseError> {
    let entry = normalize(path);
    let mut session = Session::new(mode, loader);
    let project = load_project(&entry, &mut session);

    let mut orchestrator = Orchestrator::new(mode, session, project);
    let package = orchestrator.run(&entry).ok();
    conclude(orchestrator.session, package)
}

/// Parse one in-memory buffer as a single module.
///
/// Imports are not followed and the resolver does not run. Operators come from the buffer's own fixity declarations
/// and the built-ins; anything else parses with the default fixity and a warning. Diagnostics are always collected
/// into the returned error, whatever the mode says.
#[tracing::instrument(skip_all, fields(name = name, mode = mode.bits()))]
pub fn parse_from(name: &str, mut source: impl Read, mode: ParseMode) -> Result<Module, ParseError> {
    let mut session = Session::with_sink(
        Sink::Collect,
        mode.is(ParseMode::SKIP_WARNINGS),
        Box::new(MemLoader::new()),
    );
    let path = PathBuf::from(name);

    let mut text = String::new();
    if let Err(err) = source.read_to_string(&mut text) {
        session.report(Some(&path), errors::io(name, &err));
        return conclude(session, None);
    }
    session.code_map.insert(path.clone(), text.as_str());

    let (tokens, lex_errors) = lexer::lex_recovering(&text);
    session.report_all(Some(&path), lex_errors);

    let (empty, _) = OperatorTable::builtin().freeze();
    let header = parser::parse_module(&tokens, ParseMode::SKIP_DEFINITIONS, empty.scope(name));
    let module_name = header.module.name().unwrap_or(name).to_string();

    let mut table = OperatorTable::builtin();
    let fixity_errors = table.define_module(&module_name, &header.module);
    session.report_all(Some(&path), fixity_errors.iter().map(|e| e.to_diagnostic()));
    let (table, _) = table.freeze();

    let parsed = parser::parse_module(&tokens, completion_mode(mode), table.scope(&module_name));
    session.report_all(Some(&path), parsed.errors);
    conclude(session, Some(parsed.module))
}

fn completion_mode(mode: ParseMode) -> ParseMode {
    if mode.is(ParseMode::SKIP_DEFINITIONS) {
        ParseMode::SKIP_DEFINITIONS
    } else {
        ParseMode::FULL_PARSE
    }
}

/// Load the package the entry file belongs to. A broken manifest is reported and the entry's directory is used as an
/// implicit package.
fn load_project(entry: &Path, session: &mut Session) -> Project {
    let dir = entry.parent().unwrap_or_else(|| Path::new(""));
    match Project::load(dir, session.code_map.loader()) {
        Ok(project) => project,
        Err(err) => {
            let kind = match err {
                ManifestError::Io { .. } => ErrorKind::Io,
                ManifestError::Json { .. } | ManifestError::Cycle { .. } => ErrorKind::Manifest,
            };
            let path = err.path().to_path_buf();
            session.report(Some(&path), CompileError::new(kind, err.to_string(), Span::default()));
            Project::implicit(dir)
        }
    }
}

/// Finish the session and turn what it collected into the caller's result.
fn conclude<T>(session: Session, result: Option<T>) -> Result<T, ParseError> {
    let finished = session.finish();
    match finished.sink {
        Sink::Collect if !finished.report.is_empty() => return Err(ParseError::Diagnostics(finished.report)),
        Sink::Stderr { .. } if finished.error_count() > 0 => {
            return Err(ParseError::Reported {
                errors: finished.error_count(),
            });
        }
        Sink::Collect | Sink::Stderr { .. } => {}
    }
    result.ok_or(ParseError::Unresolved)
}

// ============================================================================
// Orchestrator
// ============================================================================

struct Orchestrator {
    mode: ParseMode,
    session: Session,
    project: Project,
    /// Created by the first module discovery names.
    graph: Option<DependencyGraph>,
    entry: Option<String>,
    paths: HashMap<String, PathBuf>,
    native_imports: HashMap<String, Vec<PathBuf>>,
    /// Module locator results, per imported name.
    locations: HashMap<String, Result<PathBuf, FindModuleError>>,
    /// Imported modules whose file could not be read. Already reported.
    unreadable: HashSet<String>,
    /// Used for discovery parses, which never look at operators.
    empty_table: FrozenOperatorTable,
}

impl Orchestrator {
    fn new(mode: ParseMode, session: Session, project: Project) -> Self {
        Self {
            mode,
            session,
            project,
            graph: None,
            entry: None,
            paths: HashMap::new(),
            native_imports: HashMap::new(),
            locations: HashMap::new(),
            unreadable: HashSet::new(),
            empty_table: OperatorTable::builtin().freeze().0,
        }
    }

    fn run(&mut self, entry: &Path) -> Fallible<Package> {
        let mut table = if self.mode.is(ParseMode::JUST_MODULE) {
            OperatorTable::builtin()
        } else {
            OperatorTable::full()
        };
        let mut visited = HashSet::new();
        self.discover(entry, None, &mut table, &mut visited, true)?;

        let (table, fixity_errors) = table.freeze();
        for err in fixity_errors {
            let path = self.paths.get(err.module()).cloned();
            self.session.report(path.as_deref(), err.to_diagnostic());
        }

        let (Some(graph), Some(entry_name)) = (self.graph.take(), self.entry.take()) else {
            return Err(self.session.bail(Some(entry), errors::internal("discovery did not name the entry module")));
        };
        let order = match graph.resolve() {
            Ok(order) => order,
            Err(cycle) => {
                let [first, second] = &cycle.modules;
                let err = errors::circular_dependency(first, second, Span::default());
                return Err(self.session.bail(Some(entry), err));
            }
        };
        tracing::debug!(order = ?order, "resolved module order");

        let modules = self.complete(&order, &table)?;
        let package = Package {
            entry: entry_name,
            order,
            modules,
            paths: std::mem::take(&mut self.paths),
        };

        if !self.mode.is(ParseMode::SKIP_DEFINITIONS) && !resolver::resolve(&package, &mut self.session) {
            return Err(Bailout);
        }
        Ok(package)
    }

    /// First pass over one module and, recursively, everything it imports.
    ///
    /// `expected` is the name the module was imported as; `None` for the entry module. Returns `false` if the file
    /// could not be read, in which case nothing was registered for it.
    #[tracing::instrument(skip_all, fields(path = %path.display(), module = expected))]
    fn discover(
        &mut self,
        path: &Path,
        expected: Option<&str>,
        table: &mut OperatorTable,
        visited: &mut HashSet<String>,
        is_entry: bool,
    ) -> Fallible<bool> {
        let source = match self.session.load(path) {
            Ok(source) => source,
            Err(err) if is_entry => {
                return Err(self.session.bail(Some(path), errors::io(&path.display().to_string(), &err)));
            }
            Err(err) => {
                self.session.report(Some(path), errors::io(&path.display().to_string(), &err));
                if let Some(name) = expected {
                    self.unreadable.insert(name.to_string());
                }
                return Ok(false);
            }
        };

        let (tokens, lex_errors) = lexer::lex_recovering(&source);
        self.session.report_all(Some(path), lex_errors);
        let parsed = parser::parse_module(&tokens, ParseMode::SKIP_DEFINITIONS, self.empty_table.scope(""));
        self.session.report_all(Some(path), parsed.errors);
        let header = parsed.module;

        let name = self.name_module(path, expected, &header);
        visited.insert(name.clone());
        self.paths.insert(name.clone(), path.to_path_buf());
        match self.graph.as_mut() {
            Some(graph) => {
                graph.add_module(&name);
            }
            None => self.graph = Some(DependencyGraph::new(&name)),
        }
        if is_entry {
            self.entry = Some(name.clone());
        }

        let fixity_errors = table.define_module(&name, &header);
        self.session.report_all(Some(path), fixity_errors.iter().map(|e| e.to_diagnostic()));

        if self.mode.is(ParseMode::JUST_MODULE) {
            return Ok(true);
        }

        for import in &header.imports {
            let target = import.node.module.node.as_str();
            let target_span = import.node.module.span;

            if self.unreadable.contains(target) {
                continue;
            }
            let target_path = match self.locate(target) {
                Ok(found) => found,
                Err(err) => {
                    let diagnostic = match err {
                        FindModuleError::NotFound(_) => errors::missing_module(target, target_span),
                        FindModuleError::InvalidName(_) => {
                            CompileError::new(ErrorKind::MissingModule, err.to_string(), target_span)
                        }
                    };
                    self.session.report(Some(path), diagnostic);
                    continue;
                }
            };

            if is_native(&target_path) {
                tracing::debug!(module = %name, native = %target_path.display(), "native import");
                self.native_imports.entry(name.clone()).or_default().push(target_path);
                continue;
            }

            match import.node.exposing.as_ref().map(|e| &e.node) {
                Some(Exposing::All) => table.expose_all_into(&name, target, import.span),
                Some(items) => {
                    for item in items.operators() {
                        table.expose_into(&name, target, item.node.name(), item.span);
                    }
                }
                None => {}
            }

            let found = visited.contains(target) || self.discover(&target_path, Some(target), table, visited, false)?;
            if found {
                if let Some(graph) = self.graph.as_mut() {
                    graph.add_edge(target, &name);
                }
            }
        }

        Ok(true)
    }

    /// Decide the name a discovered module is registered under, reporting a header that disagrees with the file's
    /// location.
    fn name_module(&mut self, path: &Path, expected: Option<&str>, header: &Module) -> String {
        let from_path = match expected {
            Some(name) => Some(name.to_string()),
            None => self.project.module_name_for(path),
        };

        if let (Some(declared), Some(from_path)) = (header.header.as_ref(), from_path.as_ref()) {
            if declared.node.name != *from_path {
                let err = errors::module_name_mismatch(&declared.node.name, from_path, declared.span);
                self.session.report(Some(path), err);
            }
        }

        match (expected, header.name()) {
            (Some(name), _) | (None, Some(name)) => name.to_string(),
            (None, None) => from_path.unwrap_or_else(|| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "Main".to_string())
            }),
        }
    }

    fn locate(&mut self, name: &str) -> Result<PathBuf, FindModuleError> {
        if let Some(found) = self.locations.get(name) {
            return found.clone();
        }
        let found = self.project.find_module(name, self.session.code_map.loader());
        self.locations.insert(name.to_string(), found.clone());
        found
    }

    /// Second pass: parse every module in full, in `order`.
    #[tracing::instrument(skip_all, fields(modules = order.len()))]
    fn complete(&mut self, order: &[String], table: &FrozenOperatorTable) -> Fallible<HashMap<String, Module>> {
        let mode = completion_mode(self.mode);
        let mut modules = HashMap::with_capacity(order.len());

        for name in order {
            let Some(path) = self.paths.get(name).cloned() else {
                let err = errors::internal(format!("module '{}' was ordered but never discovered", name));
                return Err(self.session.bail(None, err));
            };
            let source = match self.session.load(&path) {
                Ok(source) => source,
                Err(err) => return Err(self.session.bail(Some(&path), errors::io(&path.display().to_string(), &err))),
            };

            let (tokens, lex_errors) = lexer::lex_recovering(&source);
            self.session.report_all(Some(&path), lex_errors);
            let parsed = parser::parse_module(&tokens, mode, table.scope(name));
            self.session.report_all(Some(&path), parsed.errors);

            let mut module = parsed.module;
            module.native_imports = self.native_imports.remove(name).unwrap_or_default();
            modules.insert(name.clone(), module);
        }

        Ok(modules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_syntax::ast::{Declaration, Expr};

    const MATH: &str = "module Math exposing ((+%))\n\ninfixr 6 +%\n\n(+%) a b = a + b\n";
    const MAIN: &str = "module Main exposing (main)\n\nimport Math exposing ((+%))\n\nmain = 1 +% 2 +% 3\n";

    fn body_of<'a>(module: &'a Module, value: &str) -> &'a Expr {
        module
            .values()
            .find(|(decl, _)| decl.name.node.as_str() == value)
            .map(|(decl, _)| &decl.body.node)
            .unwrap()
    }

    fn parse_mem(loader: MemLoader, entry: &str, mode: ParseMode) -> Result<Package, ParseError> {
        parse_with_loader(Path::new(entry), mode, Box::new(loader))
    }

    fn diagnostics(result: Result<Package, ParseError>) -> DiagnosticReport {
        match result {
            Err(ParseError::Diagnostics(report)) => report,
            other => panic!("expected collected diagnostics, got {:?}", other.map(|p| p.order)),
        }
    }

    #[test]
    fn imported_fixity_shapes_completion() {
        let loader = MemLoader::new()
            .with_file("src/Main.quill", MAIN)
            .with_file("src/Math.quill", MATH);
        let package = parse_mem(loader, "src/Main.quill", ParseMode::FULL_PARSE).unwrap();

        assert_eq!(package.order, vec!["Math", "Main"]);
        assert_eq!(package.entry, "Main");
        assert_eq!(package.path("Math"), Some(Path::new("src/Math.quill")));
        let main = package.module("Main").unwrap();
        assert_eq!(body_of(main, "main").to_string(), "(1 +% (2 +% 3))");
    }

    #[test]
    fn just_module_never_follows_imports() {
        let loader = MemLoader::new().with_file("src/Main.quill", MAIN);
        let package = parse_mem(
            loader,
            "src/Main.quill",
            ParseMode::JUST_MODULE | ParseMode::SKIP_WARNINGS,
        )
        .unwrap();
        assert_eq!(package.order, vec!["Main"]);
        assert_eq!(package.modules.len(), 1);
        // Without Math, `+%` gets the default fixity.
        let main = package.module("Main").unwrap();
        assert_eq!(body_of(main, "main").to_string(), "((1 +% 2) +% 3)");
    }

    #[test]
    fn skip_definitions_keeps_only_headers_and_fixities() {
        let loader = MemLoader::new()
            .with_file("src/Main.quill", MAIN)
            .with_file("src/Math.quill", MATH);
        let package = parse_mem(loader, "src/Main.quill", ParseMode::SKIP_DEFINITIONS).unwrap();
        let math = package.module("Math").unwrap();
        assert_eq!(math.declarations.len(), 1);
        assert!(matches!(math.declarations[0].node, Declaration::Infix(_)));
        let main = package.module("Main").unwrap();
        assert_eq!(main.imports.len(), 1);
        assert!(main.declarations.is_empty());
    }

    #[test]
    fn self_import_is_circular() {
        let loader = MemLoader::new().with_file("A.quill", "module A exposing (..)\n\nimport A\n\nx = 1\n");
        let report = diagnostics(parse_mem(loader, "A.quill", ParseMode::FULL_PARSE));
        assert!(report.has_kind(ErrorKind::CircularDependency));
        assert!(report.to_string().contains("Module 'A' imports itself"), "{report}");
    }

    #[test]
    fn mutual_imports_name_both_modules() {
        let loader = MemLoader::new()
            .with_file("Main.quill", "module Main exposing (..)\n\nimport Math\n\nx = 1\n")
            .with_file("Math.quill", "module Math exposing (..)\n\nimport Main\n\ny = 2\n");
        let report = diagnostics(parse_mem(loader, "Main.quill", ParseMode::FULL_PARSE));
        let cycle: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.kind() == ErrorKind::CircularDependency)
            .collect();
        assert_eq!(cycle.len(), 1);
        assert!(cycle[0].message().contains("'Main'") && cycle[0].message().contains("'Math'"));
        assert_eq!(cycle[0].path.as_deref(), Some(Path::new("Main.quill")));
    }

    #[test]
    fn missing_import_is_reported_and_siblings_continue() {
        let loader = MemLoader::new()
            .with_file(
                "Main.quill",
                "module Main exposing (..)\n\nimport Nope\nimport Math exposing ((+%))\n\nx = 1 +% 2\n",
            )
            .with_file("Math.quill", MATH);
        let report = diagnostics(parse_mem(loader, "Main.quill", ParseMode::FULL_PARSE));
        let missing: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.kind() == ErrorKind::MissingModule)
            .collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].message(), "Cannot find module 'Nope'");
        assert_eq!(missing[0].position, Some((3, 8)));
        assert!(!report.has_kind(ErrorKind::Fixity));
    }

    #[test]
    fn unreadable_entry_is_fatal() {
        let report = diagnostics(parse_mem(MemLoader::new(), "Main.quill", ParseMode::FULL_PARSE));
        assert_eq!(report.len(), 1);
        assert_eq!(report.diagnostics[0].kind(), ErrorKind::Io);
    }

    #[test]
    fn declared_name_must_match_path() {
        let loader = MemLoader::new()
            .with_file("Main.quill", "module Main exposing (..)\n\nimport Util\n\nx = 1\n")
            .with_file("Util.quill", "module Utils exposing (..)\n\ny = 2\n");
        let report = diagnostics(parse_mem(loader, "Main.quill", ParseMode::FULL_PARSE));
        assert!(report.has_kind(ErrorKind::ModuleName));
        assert_eq!(report.errors().count(), 1, "{report}");
    }

    #[test]
    fn native_imports_stay_out_of_the_graph() {
        let loader = MemLoader::new()
            .with_file("Main.quill", "module Main exposing (..)\n\nimport Ffi\n\nx = Ffi.now 0\n")
            .with_file("Ffi.rs", "pub fn now(_: i64) -> i64 { 0 }\n");
        let package = parse_mem(loader, "Main.quill", ParseMode::FULL_PARSE).unwrap();
        assert_eq!(package.order, vec!["Main"]);
        assert_eq!(
            package.module("Main").unwrap().native_imports,
            vec![PathBuf::from("Ffi.rs")]
        );
    }

    #[test]
    fn unknown_operator_is_an_error_in_a_package() {
        let loader = MemLoader::new().with_file("Main.quill", "module Main exposing (..)\n\nx a b = a <+> b\n");
        let report = diagnostics(parse_mem(loader, "Main.quill", ParseMode::FULL_PARSE));
        assert_eq!(report.errors().count(), 1);
        assert_eq!(report.diagnostics[0].message(), "Unknown operator '<+>'");
    }

    #[test]
    fn expose_all_import_respects_the_header() {
        let loader = MemLoader::new()
            .with_file(
                "Math.quill",
                "module Math exposing (square)\n\ninfixr 6 +%\n\n(+%) a b = a + b\n\nsquare x = x * x\n",
            )
            .with_file(
                "Main.quill",
                "module Main exposing (main)\n\nimport Math exposing (..)\n\nmain = 1 +% square 2\n",
            );
        let report = diagnostics(parse_mem(loader, "Main.quill", ParseMode::FULL_PARSE));
        let unknown: Vec<_> = report.errors().filter(|d| d.kind() == ErrorKind::Fixity).collect();
        assert_eq!(unknown.len(), 1, "{report}");
        assert_eq!(unknown[0].message(), "Unknown operator '+%'");
        assert_eq!(unknown[0].path.as_deref(), Some(Path::new("Main.quill")));
    }

    /// Serves `inner`, except that reading `broken` fails even though the file exists.
    struct BrokenFile {
        inner: MemLoader,
        broken: PathBuf,
    }

    impl SourceLoader for BrokenFile {
        fn read(&self, path: &Path) -> std::io::Result<String> {
            if path == self.broken {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "stream did not contain valid UTF-8",
                ));
            }
            self.inner.read(path)
        }

        fn is_file(&self, path: &Path) -> bool {
            path == self.broken || self.inner.is_file(path)
        }
    }

    #[test]
    fn unreadable_import_is_reported_once_and_siblings_continue() {
        let inner = MemLoader::new()
            .with_file(
                "Main.quill",
                "module Main exposing (main)\n\nimport Bad\nimport Other\nimport Good exposing ((<+>))\n\nmain = 1 <+> 2 <+> 3\n",
            )
            .with_file("Other.quill", "module Other exposing (..)\n\nimport Bad\n\ny = 2\n")
            .with_file("Good.quill", "module Good exposing ((<+>))\n\ninfixr 5 <+>\n\n(<+>) a b = a\n");
        let loader = BrokenFile {
            inner,
            broken: PathBuf::from("Bad.quill"),
        };

        let mut session = Session::with_sink(Sink::Collect, false, Box::new(loader));
        let project = load_project(Path::new("Main.quill"), &mut session);
        let mut orchestrator = Orchestrator::new(ParseMode::FULL_PARSE, session, project);
        let package = orchestrator.run(Path::new("Main.quill")).unwrap();

        assert_eq!(package.order, vec!["Other", "Good", "Main"]);
        assert!(package.module("Bad").is_none());
        let main = package.module("Main").unwrap();
        assert_eq!(body_of(main, "main").to_string(), "(1 <+> (2 <+> 3))");

        let report = orchestrator.session.finish().report;
        assert_eq!(report.len(), 1, "{report}");
        assert_eq!(report.diagnostics[0].kind(), ErrorKind::Io);
        assert_eq!(report.diagnostics[0].path.as_deref(), Some(Path::new("Bad.quill")));
    }

    #[test]
    fn parse_from_ignores_imports_but_flags_unknown_operators() {
        let source = "module Scratch exposing (..)\n\nimport Missing exposing ((<+>))\n\nx = 1 <+> 2\n";
        let err = parse_from("Scratch", source.as_bytes(), ParseMode::FULL_PARSE).unwrap_err();
        let report = err.report().unwrap();
        assert!(!report.has_kind(ErrorKind::MissingModule));
        assert_eq!(report.len(), 1);
        assert!(report.diagnostics[0].message().contains("'<+>'"));

        let module = parse_from("Scratch", source.as_bytes(), ParseMode::SKIP_WARNINGS).unwrap();
        assert_eq!(module.name(), Some("Scratch"));
    }

    #[test]
    fn parse_from_uses_local_fixities() {
        let source = "module Local exposing (..)\n\ninfixr 2 <+>\n\n(<+>) a b = a\n\nx = 1 <+> 2 <+> 3\n";
        let module = parse_from("Local", source.as_bytes(), ParseMode::STDERR_DIAGNOSTICS).unwrap();
        assert_eq!(body_of(&module, "x").to_string(), "(1 <+> (2 <+> 3))");
    }
}
