//! Operator fixity table shared by every module of a package.
//!
//! Fixities are collected in two phases:
//!
//! 1. While modules are discovered, [`OperatorTable::define`] registers each module's own `infixl`/`infixr`/`infix`
//!    declarations and [`OperatorTable::expose_into`] records which operators an import brings into scope.
//! 2. [`OperatorTable::freeze`] validates the recorded exposures and produces a [`FrozenOperatorTable`]. The
//!    parser only ever sees the frozen table, through a per-module [`FixityScope`].
//!
//! Lookup order inside a module: operators the module defines, then operators exposed into it by imports, then the
//! built-in operators from `quill_core::lang::operators`.

use std::collections::{HashMap, HashSet};

use quill_core::lang::operators::{self, Associativity, MAX_PRECEDENCE};
use thiserror::Error;

use crate::ast::{Exposing, Module, Span};
use crate::diagnostics::CompileError;

/// Precedence and associativity of one operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixity {
    pub associativity: Associativity,
    pub precedence: u8,
}

impl Fixity {
    pub fn new(associativity: Associativity, precedence: u8) -> Self {
        Self {
            associativity,
            precedence,
        }
    }

    /// Fixity assumed for an operator nobody declared, when unknown operators are tolerated.
    pub fn default_for_unknown() -> Self {
        Self::new(operators::DEFAULT_ASSOCIATIVITY, operators::DEFAULT_PRECEDENCE)
    }
}

/// A user-defined operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorEntry {
    pub name: String,
    pub module: String,
    pub fixity: Fixity,
    pub span: Span,
}

/// What the parser does with an operator that resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownOperatorPolicy {
    /// Parse with [`Fixity::default_for_unknown`] and report a warning.
    Lenient,
    /// Report an error and recover with an error node.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixityError {
    #[error("operator '{operator}' is already defined in module '{module}'")]
    Redefined {
        operator: String,
        module: String,
        span: Span,
        previous: Span,
    },

    #[error("precedence {precedence} of operator '{operator}' is outside 0..={MAX_PRECEDENCE}")]
    PrecedenceOutOfRange {
        operator: String,
        module: String,
        precedence: u8,
        span: Span,
    },

    #[error("module '{source_module}' does not define operator '{operator}'")]
    NotDefined {
        operator: String,
        source_module: String,
        consumer: String,
        span: Span,
    },

    #[error("operator '{operator}' is exposed into '{consumer}' by both '{first}' and '{second}'")]
    Ambiguous {
        operator: String,
        consumer: String,
        first: String,
        second: String,
        span: Span,
    },
}

impl FixityError {
    /// Module whose source the error points into.
    pub fn module(&self) -> &str {
        match self {
            FixityError::Redefined { module, .. } | FixityError::PrecedenceOutOfRange { module, .. } => module,
            FixityError::NotDefined { consumer, .. } | FixityError::Ambiguous { consumer, .. } => consumer,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            FixityError::Redefined { span, .. }
            | FixityError::PrecedenceOutOfRange { span, .. }
            | FixityError::NotDefined { span, .. }
            | FixityError::Ambiguous { span, .. } => *span,
        }
    }

    pub fn to_diagnostic(&self) -> CompileError {
        let err = CompileError::fixity(self.to_string(), self.span());
        match self {
            FixityError::Redefined { .. } => err.with_note("the first definition is kept"),
            FixityError::Ambiguous { .. } => err.with_hint("Import the operator from only one of the modules"),
            FixityError::PrecedenceOutOfRange { .. } | FixityError::NotDefined { .. } => err,
        }
    }
}

/// Deferred `import Source exposing (...)` binding, validated at freeze time.
#[derive(Debug, Clone)]
struct Exposure {
    consumer: String,
    source: String,
    /// `None` for `exposing (..)`.
    operator: Option<String>,
    span: Span,
}

type ModuleOperators = HashMap<String, HashMap<String, OperatorEntry>>;

// ============================================================================
// Mutable table
// ============================================================================

/// Operator table under construction.
#[derive(Debug, Clone)]
pub struct OperatorTable {
    policy: UnknownOperatorPolicy,
    /// Every module that was parsed, whether or not it defines operators.
    modules: HashSet<String>,
    defined: ModuleOperators,
    /// Operators each module's header lists by name. A module missing here exposes everything it defines.
    exported: HashMap<String, HashSet<String>>,
    exposures: Vec<Exposure>,
}

impl OperatorTable {
    /// Table for parsing a single module in isolation. Unknown operators are tolerated.
    pub fn builtin() -> Self {
        Self::with_policy(UnknownOperatorPolicy::Lenient)
    }

    /// Table for parsing a whole package. Unknown operators are errors.
    pub fn full() -> Self {
        Self::with_policy(UnknownOperatorPolicy::Strict)
    }

    fn with_policy(policy: UnknownOperatorPolicy) -> Self {
        Self {
            policy,
            modules: HashSet::new(),
            defined: HashMap::new(),
            exported: HashMap::new(),
            exposures: Vec::new(),
        }
    }

    pub fn policy(&self) -> UnknownOperatorPolicy {
        self.policy
    }

    /// Note that `module` was parsed, so exposures naming it can be checked.
    pub fn register_module(&mut self, module: &str) {
        self.modules.insert(module.to_string());
    }

    /// Register an operator defined by `module`.
    ///
    /// ## Errors
    /// - [`FixityError::Redefined`] if `module` already defines `name`. The first definition wins.
    /// - [`FixityError::PrecedenceOutOfRange`] if `precedence` exceeds [`MAX_PRECEDENCE`].
    pub fn define(
        &mut self,
        name: &str,
        module: &str,
        associativity: Associativity,
        precedence: u8,
        span: Span,
    ) -> Result<(), FixityError> {
        if precedence > MAX_PRECEDENCE {
            return Err(FixityError::PrecedenceOutOfRange {
                operator: name.to_string(),
                module: module.to_string(),
                precedence,
                span,
            });
        }

        self.register_module(module);
        let operators = self.defined.entry(module.to_string()).or_default();
        if let Some(previous) = operators.get(name) {
            return Err(FixityError::Redefined {
                operator: name.to_string(),
                module: module.to_string(),
                span,
                previous: previous.span,
            });
        }

        tracing::debug!(operator = name, module, precedence, %associativity, "defined operator");
        operators.insert(
            name.to_string(),
            OperatorEntry {
                name: name.to_string(),
                module: module.to_string(),
                fixity: Fixity::new(associativity, precedence),
                span,
            },
        );
        Ok(())
    }

    /// Register `module` and every fixity declaration it contains. Rejected declarations are returned; the others
    /// are still registered.
    pub fn define_module(&mut self, name: &str, module: &Module) -> Vec<FixityError> {
        self.register_module(name);
        if let Some(header) = &module.header {
            if let Exposing::Items(_) = &header.node.exposing.node {
                let listed = header.node.exposing.node.operators().map(|item| item.node.name().to_string());
                self.restrict_exports(name, listed);
            }
        }
        module
            .fixities()
            .filter_map(|(infix, span)| {
                self.define(&infix.operator.node, name, infix.associativity, infix.precedence, span)
                    .err()
            })
            .collect()
    }

    /// Limit what `exposing (..)` on an import of `module` brings into scope to `operators`.
    pub fn restrict_exports(&mut self, module: &str, operators: impl IntoIterator<Item = String>) {
        self.exported.entry(module.to_string()).or_default().extend(operators);
    }

    fn is_exported(&self, module: &str, operator: &str) -> bool {
        self.exported
            .get(module)
            .is_none_or(|listed| listed.contains(operator))
    }

    /// Record that `consumer` imports `source` exposing operator `name`.
    pub fn expose_into(&mut self, consumer: &str, source: &str, name: &str, span: Span) {
        self.exposures.push(Exposure {
            consumer: consumer.to_string(),
            source: source.to_string(),
            operator: Some(name.to_string()),
            span,
        });
    }

    /// Record that `consumer` imports `source` exposing everything.
    pub fn expose_all_into(&mut self, consumer: &str, source: &str, span: Span) {
        self.exposures.push(Exposure {
            consumer: consumer.to_string(),
            source: source.to_string(),
            operator: None,
            span,
        });
    }

    /// Fixity of `name` as seen from `module` while the table is still being built. Exposures are not applied yet.
    pub fn lookup_defined(&self, module: &str, name: &str) -> Option<Fixity> {
        self.defined
            .get(module)
            .and_then(|ops| ops.get(name))
            .map(|entry| entry.fixity)
            .or_else(|| builtin_fixity(name))
    }

    /// Apply every recorded exposure and end the mutation phase.
    ///
    /// Exposures whose source module was never parsed are dropped silently; the missing import is reported
    /// elsewhere. The returned errors are recoverable: the offending exposure is skipped and the table stays
    /// usable.
    #[tracing::instrument(skip_all, fields(modules = self.modules.len(), exposures = self.exposures.len()))]
    pub fn freeze(self) -> (FrozenOperatorTable, Vec<FixityError>) {
        let mut errors = Vec::new();
        let mut exposed: ModuleOperators = HashMap::new();

        for exposure in &self.exposures {
            if !self.modules.contains(&exposure.source) {
                continue;
            }
            let source_ops = self.defined.get(&exposure.source);

            let entries: Vec<&OperatorEntry> = match &exposure.operator {
                Some(name) => match source_ops.and_then(|ops| ops.get(name)) {
                    Some(entry) => vec![entry],
                    None => {
                        errors.push(FixityError::NotDefined {
                            operator: name.clone(),
                            source_module: exposure.source.clone(),
                            consumer: exposure.consumer.clone(),
                            span: exposure.span,
                        });
                        continue;
                    }
                },
                None => {
                    let mut all: Vec<&OperatorEntry> = source_ops
                        .map(|ops| {
                            ops.values()
                                .filter(|entry| self.is_exported(&exposure.source, &entry.name))
                                .collect()
                        })
                        .unwrap_or_default();
                    all.sort_by(|a, b| a.name.cmp(&b.name));
                    all
                }
            };

            let scope = exposed.entry(exposure.consumer.clone()).or_default();
            for entry in entries {
                match scope.get(&entry.name) {
                    Some(existing) if existing.module != entry.module => {
                        errors.push(FixityError::Ambiguous {
                            operator: entry.name.clone(),
                            consumer: exposure.consumer.clone(),
                            first: existing.module.clone(),
                            second: entry.module.clone(),
                            span: exposure.span,
                        });
                    }
                    Some(_) => {}
                    None => {
                        scope.insert(entry.name.clone(), entry.clone());
                    }
                }
            }
        }

        let frozen = FrozenOperatorTable {
            policy: self.policy,
            defined: self.defined,
            exposed,
        };
        (frozen, errors)
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_fixity(name: &str) -> Option<Fixity> {
    operators::from_str(name).map(|id| {
        let info = operators::info_for(id);
        Fixity::new(info.associativity, info.precedence)
    })
}

// ============================================================================
// Frozen table
// ============================================================================

/// Immutable operator table consulted while parsing expression bodies.
#[derive(Debug, Clone)]
pub struct FrozenOperatorTable {
    policy: UnknownOperatorPolicy,
    defined: ModuleOperators,
    exposed: ModuleOperators,
}

impl FrozenOperatorTable {
    pub fn policy(&self) -> UnknownOperatorPolicy {
        self.policy
    }

    /// Resolve `name` as seen from inside `module`.
    pub fn lookup(&self, module: &str, name: &str) -> Option<Fixity> {
        self.entry(module, name)
            .map(|entry| entry.fixity)
            .or_else(|| builtin_fixity(name))
    }

    /// The user-defined entry `name` resolves to inside `module`, if it is not built in.
    pub fn entry(&self, module: &str, name: &str) -> Option<&OperatorEntry> {
        self.defined
            .get(module)
            .and_then(|ops| ops.get(name))
            .or_else(|| self.exposed.get(module).and_then(|ops| ops.get(name)))
    }

    /// Operators `module` defines itself.
    pub fn defined_in(&self, module: &str) -> impl Iterator<Item = &OperatorEntry> + '_ {
        self.defined.get(module).into_iter().flat_map(|ops| ops.values())
    }

    /// View of the table from inside one module.
    pub fn scope<'a>(&'a self, module: &'a str) -> FixityScope<'a> {
        FixityScope { table: self, module }
    }
}

/// The operator table as seen from one module; this is what the parser consults.
#[derive(Debug, Clone, Copy)]
pub struct FixityScope<'a> {
    table: &'a FrozenOperatorTable,
    module: &'a str,
}

impl<'a> FixityScope<'a> {
    pub fn lookup(&self, name: &str) -> Option<Fixity> {
        self.table.lookup(self.module, name)
    }

    pub fn policy(&self) -> UnknownOperatorPolicy {
        self.table.policy
    }

    pub fn module(&self) -> &'a str {
        self.module
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp(start: usize) -> Span {
        Span::new(start, start + 1)
    }

    #[test]
    fn builtins_resolve_everywhere() {
        let (table, errors) = OperatorTable::full().freeze();
        assert!(errors.is_empty());
        assert_eq!(table.lookup("Anything", "+"), Some(Fixity::new(Associativity::Left, 6)));
        assert_eq!(table.lookup("Anything", "^"), Some(Fixity::new(Associativity::Right, 8)));
        assert_eq!(table.lookup("Anything", "+%"), None);
    }

    #[test]
    fn redefinition_in_same_module_is_rejected() {
        let mut table = OperatorTable::full();
        table.define("+%", "Math", Associativity::Right, 6, sp(0)).unwrap();
        let err = table.define("+%", "Math", Associativity::Left, 2, sp(10)).unwrap_err();
        assert!(matches!(err, FixityError::Redefined { ref module, .. } if module == "Math"));
        // The first definition survives.
        assert_eq!(
            table.lookup_defined("Math", "+%"),
            Some(Fixity::new(Associativity::Right, 6))
        );
    }

    #[test]
    fn same_symbol_in_different_modules_is_fine() {
        let mut table = OperatorTable::full();
        table.define("<>", "A", Associativity::Left, 5, sp(0)).unwrap();
        table.define("<>", "B", Associativity::Right, 3, sp(0)).unwrap();
        let (frozen, errors) = table.freeze();
        assert!(errors.is_empty());
        assert_eq!(frozen.lookup("A", "<>"), Some(Fixity::new(Associativity::Left, 5)));
        assert_eq!(frozen.lookup("B", "<>"), Some(Fixity::new(Associativity::Right, 3)));
    }

    #[test]
    fn precedence_above_nine_is_rejected() {
        let mut table = OperatorTable::full();
        let err = table.define("+%", "Math", Associativity::Left, 10, sp(0)).unwrap_err();
        assert!(matches!(err, FixityError::PrecedenceOutOfRange { precedence: 10, .. }));
    }

    #[test]
    fn exposure_brings_operator_into_scope() {
        let mut table = OperatorTable::full();
        table.define("+%", "Math", Associativity::Right, 6, sp(0)).unwrap();
        table.register_module("Main");
        table.expose_into("Main", "Math", "+%", sp(20));
        let (frozen, errors) = table.freeze();
        assert!(errors.is_empty());
        assert_eq!(frozen.lookup("Main", "+%"), Some(Fixity::new(Associativity::Right, 6)));
        assert_eq!(frozen.entry("Main", "+%").map(|e| e.module.as_str()), Some("Math"));
        // Not exposed anywhere else.
        assert_eq!(frozen.lookup("Other", "+%"), None);
    }

    #[test]
    fn local_definition_beats_exposure_and_builtin() {
        let mut table = OperatorTable::full();
        table.define("|>", "Pipes", Associativity::Right, 1, sp(0)).unwrap();
        table.define("|>", "Main", Associativity::Left, 0, sp(0)).unwrap();
        table.expose_into("Main", "Pipes", "|>", sp(5));
        let (frozen, errors) = table.freeze();
        assert!(errors.is_empty());
        assert_eq!(frozen.lookup("Main", "|>"), Some(Fixity::new(Associativity::Left, 0)));
    }

    #[test]
    fn exposure_overrides_builtin() {
        let mut table = OperatorTable::full();
        table.define("|>", "Pipes", Associativity::Right, 3, sp(0)).unwrap();
        table.expose_into("Main", "Pipes", "|>", sp(5));
        let (frozen, _) = table.freeze();
        assert_eq!(frozen.lookup("Main", "|>"), Some(Fixity::new(Associativity::Right, 3)));
        assert_eq!(frozen.lookup("Elsewhere", "|>"), Some(Fixity::new(Associativity::Left, 0)));
    }

    #[test]
    fn exposing_undefined_operator_is_an_error() {
        let mut table = OperatorTable::full();
        table.register_module("Math");
        table.expose_into("Main", "Math", "+%", sp(7));
        let (frozen, errors) = table.freeze();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].module(), "Main");
        assert_eq!(errors[0].span(), sp(7));
        assert_eq!(frozen.lookup("Main", "+%"), None);
    }

    #[test]
    fn exposure_from_unparsed_module_is_ignored() {
        let mut table = OperatorTable::full();
        table.expose_into("Main", "Missing", "+%", sp(7));
        let (_, errors) = table.freeze();
        assert!(errors.is_empty());
    }

    #[test]
    fn same_operator_from_two_modules_is_ambiguous() {
        let mut table = OperatorTable::full();
        table.define("<>", "A", Associativity::Left, 5, sp(0)).unwrap();
        table.define("<>", "B", Associativity::Right, 3, sp(0)).unwrap();
        table.expose_into("Main", "A", "<>", sp(1));
        table.expose_into("Main", "B", "<>", sp(2));
        let (frozen, errors) = table.freeze();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], FixityError::Ambiguous { first, second, .. } if first == "A" && second == "B"));
        // First exposure wins.
        assert_eq!(frozen.lookup("Main", "<>"), Some(Fixity::new(Associativity::Left, 5)));
    }

    #[test]
    fn expose_all_brings_every_operator() {
        let mut table = OperatorTable::full();
        table.define("+%", "Math", Associativity::Right, 6, sp(0)).unwrap();
        table.define("*%", "Math", Associativity::Left, 7, sp(0)).unwrap();
        table.expose_all_into("Main", "Math", sp(3));
        let (frozen, errors) = table.freeze();
        assert!(errors.is_empty());
        assert!(frozen.lookup("Main", "+%").is_some());
        assert!(frozen.lookup("Main", "*%").is_some());
    }

    #[test]
    fn expose_all_skips_operators_the_header_hides() {
        let mut table = OperatorTable::full();
        table.define("+%", "Math", Associativity::Right, 6, sp(0)).unwrap();
        table.define("*%", "Math", Associativity::Left, 7, sp(0)).unwrap();
        table.restrict_exports("Math", ["*%".to_string()]);
        table.expose_all_into("Main", "Math", sp(3));
        let (frozen, errors) = table.freeze();
        assert!(errors.is_empty());
        assert_eq!(frozen.lookup("Main", "+%"), None);
        assert_eq!(frozen.lookup("Main", "*%"), Some(Fixity::new(Associativity::Left, 7)));
        // The defining module still sees its own operator.
        assert!(frozen.lookup("Math", "+%").is_some());
    }

    #[test]
    fn define_module_reads_the_header_exposing_list() {
        let source = "module Math exposing (square)\n\ninfixr 6 +%\n";
        let tokens = crate::lexer::lex(source).unwrap();
        let module = crate::parser::parse(&tokens).unwrap();
        let mut table = OperatorTable::full();
        assert!(table.define_module("Math", &module).is_empty());
        table.expose_all_into("Main", "Math", sp(3));
        let (frozen, errors) = table.freeze();
        assert!(errors.is_empty());
        assert_eq!(frozen.lookup("Main", "+%"), None);
    }

    #[test]
    fn policies_follow_constructor() {
        assert_eq!(OperatorTable::builtin().policy(), UnknownOperatorPolicy::Lenient);
        let (frozen, _) = OperatorTable::full().freeze();
        assert_eq!(frozen.scope("Main").policy(), UnknownOperatorPolicy::Strict);
        assert_eq!(frozen.scope("Main").module(), "Main");
    }

    #[test]
    fn frozen_table_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FrozenOperatorTable>();
    }
}
