//! Name resolution over a parsed package.
//!
//! Runs after completion, on the whole [`Package`]. Checks that every name a module uses or exposes exists:
//! top-level definitions, header and import `exposing` lists, fixity declarations, local and qualified variables.
//! Modules outside the package (missing, native, or not followed under `JUST_MODULE`) are trusted: anything imported
//! from them is assumed to exist.

use std::collections::{HashMap, HashSet};

use quill_core::lang::prelude;
use quill_syntax::ast::{DeclName, ExposedItem, Exposing, Expr, ImportDecl, Module, Spanned};
use quill_syntax::diagnostics::{CompileError, ErrorKind, errors};

use super::orchestrator::Package;
use super::session::Session;

/// Check every module of `package`, reporting problems to `session`.
///
/// Returns `true` if no error was reported.
#[tracing::instrument(skip_all, fields(modules = package.len()))]
pub fn resolve(package: &Package, session: &mut Session) -> bool {
    let before = session.reporter.error_count();

    let exports: HashMap<&str, Exports<'_>> = package
        .iter()
        .map(|(name, module)| (name, Exports::of(module)))
        .collect();

    for (name, module) in package.iter() {
        let errors = ModuleCheck::new(name, module, &exports).run();
        session.report_all(package.path(name), errors);
    }

    let ok = session.reporter.error_count() == before;
    if !ok {
        tracing::debug!("package rejected by the resolver");
    }
    ok
}

/// What a module defines and what it makes visible to importers.
#[derive(Debug, Default)]
struct Exports<'a> {
    values: HashSet<&'a str>,
    operators: HashSet<&'a str>,
    exposed_values: HashSet<&'a str>,
    exposed_operators: HashSet<&'a str>,
}

impl<'a> Exports<'a> {
    fn of(module: &'a Module) -> Self {
        let mut exports = Exports::default();
        for (value, _) in module.values() {
            match &value.name.node {
                DeclName::Value(name) => exports.values.insert(name.as_str()),
                DeclName::Operator(op) => exports.operators.insert(op.as_str()),
            };
        }

        match module.header.as_ref().map(|h| &h.node.exposing.node) {
            Some(Exposing::All) | None => {
                exports.exposed_values = exports.values.clone();
                exports.exposed_operators = exports.operators.clone();
            }
            Some(Exposing::Items(items)) => {
                for item in items {
                    match &item.node {
                        ExposedItem::Value(name) if exports.values.contains(name.as_str()) => {
                            exports.exposed_values.insert(name.as_str());
                        }
                        ExposedItem::Operator(op) if exports.operators.contains(op.as_str()) => {
                            exports.exposed_operators.insert(op.as_str());
                        }
                        _ => {}
                    }
                }
            }
        }
        exports
    }

    fn exposes(&self, item: &ExposedItem) -> bool {
        match item {
            ExposedItem::Value(name) => self.exposed_values.contains(name.as_str()),
            ExposedItem::Operator(op) => self.exposed_operators.contains(op.as_str()),
            // There are no type declarations to check against.
            ExposedItem::Type { .. } => true,
        }
    }
}

fn resolution_error(message: String, span: quill_syntax::ast::Span) -> CompileError {
    CompileError::new(ErrorKind::Resolution, message, span)
}

struct ModuleCheck<'a> {
    name: &'a str,
    module: &'a Module,
    exports: &'a HashMap<&'a str, Exports<'a>>,
    /// Unqualified names visible everywhere in the module.
    top_level: HashSet<&'a str>,
    /// An `import X exposing (..)` from outside the package hides which names are in scope.
    open_scope: bool,
    errors: Vec<CompileError>,
}

impl<'a> ModuleCheck<'a> {
    fn new(name: &'a str, module: &'a Module, exports: &'a HashMap<&'a str, Exports<'a>>) -> Self {
        Self {
            name,
            module,
            exports,
            top_level: HashSet::new(),
            open_scope: false,
            errors: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<CompileError> {
        self.definitions();
        self.header_exposing();
        self.fixities();
        self.imports();

        let module = self.module;
        for (value, _) in module.values() {
            let mut locals = Vec::new();
            for param in &value.params {
                param.node.bound_names(&mut locals);
            }
            self.expr(&value.body, &mut locals);
        }
        self.errors
    }

    fn definitions(&mut self) {
        let module = self.module;
        let mut seen: HashSet<&DeclName> = HashSet::new();
        for (value, _) in module.values() {
            let name = &value.name.node;
            if !seen.insert(name) {
                self.errors.push(
                    resolution_error(format!("Duplicate definition of '{}'", name), value.name.span)
                        .with_note("only one definition per name is allowed in a module"),
                );
            }
            if let DeclName::Value(name) = name {
                self.top_level.insert(name.as_str());
            }
        }
    }

    fn header_exposing(&mut self) {
        let (module, exports) = (self.module, self.exports);
        let Some(Exposing::Items(items)) = module.header.as_ref().map(|h| &h.node.exposing.node) else {
            return;
        };
        let own = &exports[self.name];
        for item in items {
            let defined = match &item.node {
                ExposedItem::Value(name) => own.values.contains(name.as_str()),
                ExposedItem::Operator(op) => own.operators.contains(op.as_str()),
                ExposedItem::Type { .. } => true,
            };
            if !defined {
                self.errors.push(resolution_error(
                    format!(
                        "Module '{}' exposes '{}' but does not define it",
                        self.name,
                        display_item(&item.node)
                    ),
                    item.span,
                ));
            }
        }
    }

    fn fixities(&mut self) {
        let (module, exports) = (self.module, self.exports);
        let own = &exports[self.name];
        for (infix, _) in module.fixities() {
            if !own.operators.contains(infix.operator.node.as_str()) {
                self.errors.push(
                    resolution_error(
                        format!(
                            "Operator '{}' has a fixity declaration but no definition",
                            infix.operator.node
                        ),
                        infix.operator.span,
                    )
                    .with_hint(format!("Define it with `({}) a b = ...`", infix.operator.node)),
                );
            }
        }
    }

    fn imports(&mut self) {
        let (module, exports) = (self.module, self.exports);
        for import in &module.imports {
            let import = &import.node;
            let target = exports.get(import.module.node.as_str());
            match import.exposing.as_ref().map(|e| &e.node) {
                None => {}
                Some(Exposing::All) => match target {
                    Some(target) => self.top_level.extend(target.exposed_values.iter().copied()),
                    None => self.open_scope = true,
                },
                Some(Exposing::Items(items)) => {
                    for item in items {
                        if let Some(target) = target {
                            if !target.exposes(&item.node) {
                                self.errors.push(resolution_error(
                                    format!(
                                        "Module '{}' does not expose '{}'",
                                        import.module.node,
                                        display_item(&item.node)
                                    ),
                                    item.span,
                                ));
                            }
                        }
                        if let ExposedItem::Value(name) = &item.node {
                            self.top_level.insert(name.as_str());
                        }
                    }
                }
            }
        }
    }

    fn import_for(&self, qualifier: &str) -> Option<&'a ImportDecl> {
        let module: &'a Module = self.module;
        module
            .imports
            .iter()
            .map(|import| &import.node)
            .find(|import| import.qualifier() == qualifier)
    }

    fn is_bound(&self, name: &str, locals: &[&'a str]) -> bool {
        self.open_scope || locals.contains(&name) || self.top_level.contains(name) || prelude::contains(name)
    }

    fn expr(&mut self, expr: &'a Spanned<Expr>, locals: &mut Vec<&'a str>) {
        match &expr.node {
            Expr::Int(_) | Expr::Float(_) | Expr::Str(_) | Expr::Constructor(_) | Expr::OperatorRef(_) | Expr::Error => {}
            Expr::Var(name) => {
                if !self.is_bound(name, locals) {
                    self.errors.push(errors::unbound_name(name, expr.span));
                }
            }
            Expr::Qualified { module, name } => self.qualified(module, name, expr),
            Expr::Apply(func, args) => {
                self.expr(func, locals);
                for arg in args {
                    self.expr(arg, locals);
                }
            }
            Expr::Binary { left, right, .. } => {
                self.expr(left, locals);
                self.expr(right, locals);
            }
            Expr::Negate(inner) => self.expr(inner, locals),
            Expr::Lambda { params, body } => {
                let mark = locals.len();
                for param in params {
                    param.node.bound_names(locals);
                }
                self.expr(body, locals);
                locals.truncate(mark);
            }
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.expr(cond, locals);
                self.expr(then_branch, locals);
                self.expr(else_branch, locals);
            }
            Expr::Let { pattern, value, body } => {
                self.expr(value, locals);
                let mark = locals.len();
                pattern.node.bound_names(locals);
                self.expr(body, locals);
                locals.truncate(mark);
            }
            Expr::Tuple(items) | Expr::List(items) => {
                for item in items {
                    self.expr(item, locals);
                }
            }
        }
    }

    fn qualified(&mut self, qualifier: &str, name: &str, expr: &Spanned<Expr>) {
        let Some(import) = self.import_for(qualifier) else {
            self.errors.push(
                resolution_error(format!("Module '{}' is not imported", qualifier), expr.span)
                    .with_hint(format!("Add `import {}`", qualifier)),
            );
            return;
        };
        let exports = self.exports;
        let Some(target) = exports.get(import.module.node.as_str()) else {
            return;
        };
        if !target.exposed_values.contains(name) {
            self.errors.push(resolution_error(
                format!("Module '{}' does not expose '{}'", import.module.node, name),
                expr.span,
            ));
        }
    }
}

fn display_item(item: &ExposedItem) -> String {
    match item {
        ExposedItem::Operator(op) => format!("({})", op),
        ExposedItem::Value(name) | ExposedItem::Type { name, .. } => name.clone(),
    }
}
