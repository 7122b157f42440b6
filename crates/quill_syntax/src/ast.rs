//! Abstract Syntax Tree definitions for Quill
//!
//! A parsed source file is a [`Module`]: a header, the imports, and the top-level declarations. The discovery pass
//! fills in only the header, imports and fixity declarations; the completion pass produces everything.

use std::fmt;
use std::path::PathBuf;

use quill_core::lang::operators::Associativity;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Identifier. Qualified names keep their dots (`Math.square`).
pub type Ident = String;

// ============================================================================
// Modules
// ============================================================================

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    /// `module Name exposing (...)`; `None` when the header failed to parse.
    pub header: Option<Spanned<ModuleHeader>>,
    pub imports: Vec<Spanned<ImportDecl>>,
    /// Host-interop files this module imports. Filled in by the package discovery pass; these never take part in
    /// dependency ordering.
    pub native_imports: Vec<PathBuf>,
    pub declarations: Vec<Spanned<Declaration>>,
}

impl Module {
    /// Declared module name, if the header parsed.
    pub fn name(&self) -> Option<&str> {
        self.header.as_ref().map(|h| h.node.name.as_str())
    }

    /// Fixity declarations in source order.
    pub fn fixities(&self) -> impl Iterator<Item = (&InfixDecl, Span)> + '_ {
        self.declarations.iter().filter_map(|d| match &d.node {
            Declaration::Infix(infix) => Some((infix, d.span)),
            Declaration::Annotation(_) | Declaration::Value(_) => None,
        })
    }

    /// Value declarations in source order.
    pub fn values(&self) -> impl Iterator<Item = (&ValueDecl, Span)> + '_ {
        self.declarations.iter().filter_map(|d| match &d.node {
            Declaration::Value(value) => Some((value, d.span)),
            Declaration::Infix(_) | Declaration::Annotation(_) => None,
        })
    }
}

/// `module Math.Vector exposing (add, (+%))`
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleHeader {
    pub name: Ident,
    pub exposing: Spanned<Exposing>,
}

/// An `exposing` clause, on a module header or on an import.
#[derive(Debug, Clone, PartialEq)]
pub enum Exposing {
    /// `exposing (..)`
    All,
    /// `exposing (a, B, (+%))`
    Items(Vec<Spanned<ExposedItem>>),
}

impl Exposing {
    /// Operator names listed explicitly. `exposing (..)` lists none.
    pub fn operators(&self) -> impl Iterator<Item = &Spanned<ExposedItem>> + '_ {
        let items: &[Spanned<ExposedItem>] = match self {
            Exposing::All => &[],
            Exposing::Items(items) => items,
        };
        items.iter().filter(|item| item.node.is_operator())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExposedItem {
    /// `square`
    Value(Ident),
    /// `(+%)`
    Operator(Ident),
    /// `Shape` or `Shape(..)`
    Type { name: Ident, constructors: bool },
}

impl ExposedItem {
    pub fn is_operator(&self) -> bool {
        matches!(self, ExposedItem::Operator(_))
    }

    /// The exposed name as written, without parentheses.
    pub fn name(&self) -> &str {
        match self {
            ExposedItem::Value(name) | ExposedItem::Operator(name) | ExposedItem::Type { name, .. } => name,
        }
    }
}

// ============================================================================
// Imports
// ============================================================================

/// `import Math.Vector as V exposing ((+%))`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub module: Spanned<Ident>,
    pub alias: Option<Ident>,
    pub exposing: Option<Spanned<Exposing>>,
}

impl ImportDecl {
    /// Name this import is referred to by in qualified references.
    pub fn qualifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.module.node)
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `infixl 6 +%`
    Infix(InfixDecl),
    /// `square : Int -> Int`
    Annotation(Annotation),
    /// `square x = x * x` or `(+%) a b = ...`
    Value(ValueDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixDecl {
    pub associativity: Associativity,
    pub precedence: u8,
    pub operator: Spanned<Ident>,
}

/// Name bound by an annotation or a value declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclName {
    Value(Ident),
    Operator(Ident),
}

impl DeclName {
    pub fn as_str(&self) -> &str {
        match self {
            DeclName::Value(name) | DeclName::Operator(name) => name,
        }
    }
}

impl fmt::Display for DeclName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclName::Value(name) => write!(f, "{}", name),
            DeclName::Operator(op) => write!(f, "({})", op),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub name: DeclName,
    pub ty: Spanned<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueDecl {
    pub name: Spanned<DeclName>,
    pub params: Vec<Spanned<Pattern>>,
    pub body: Spanned<Expr>,
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `a`
    Var(Ident),
    /// `List a`, `Int`
    Named { name: Ident, args: Vec<Spanned<TypeExpr>> },
    /// `a -> b`
    Function(Box<Spanned<TypeExpr>>, Box<Spanned<TypeExpr>>),
    /// `(a, b)`; the empty tuple is unit.
    Tuple(Vec<Spanned<TypeExpr>>),
}

// ============================================================================
// Patterns
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Var(Ident),
    Wildcard,
    Int(i64),
    Str(String),
    /// `()` is the empty tuple.
    Tuple(Vec<Spanned<Pattern>>),
    Constructor { name: Ident, args: Vec<Spanned<Pattern>> },
}

impl Pattern {
    /// Collect every variable this pattern binds.
    pub fn bound_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Pattern::Var(name) => out.push(name),
            Pattern::Tuple(items) | Pattern::Constructor { args: items, .. } => {
                for item in items {
                    item.node.bound_names(out);
                }
            }
            Pattern::Wildcard | Pattern::Int(_) | Pattern::Str(_) => {}
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Str(String),
    /// Unqualified lower-case name.
    Var(Ident),
    /// `Math.square`
    Qualified { module: Ident, name: Ident },
    /// Constructor, possibly qualified (`Just`, `Shape.Circle`).
    Constructor(Ident),
    /// `f a b`
    Apply(Box<Spanned<Expr>>, Vec<Spanned<Expr>>),
    /// `a +% b`, grouped according to the operator table.
    Binary {
        op: Spanned<Ident>,
        left: Box<Spanned<Expr>>,
        right: Box<Spanned<Expr>>,
    },
    /// `-x`
    Negate(Box<Spanned<Expr>>),
    /// `\x y -> body`
    Lambda {
        params: Vec<Spanned<Pattern>>,
        body: Box<Spanned<Expr>>,
    },
    If {
        cond: Box<Spanned<Expr>>,
        then_branch: Box<Spanned<Expr>>,
        else_branch: Box<Spanned<Expr>>,
    },
    /// `let pattern = value in body`
    Let {
        pattern: Spanned<Pattern>,
        value: Box<Spanned<Expr>>,
        body: Box<Spanned<Expr>>,
    },
    /// `()` is the empty tuple.
    Tuple(Vec<Spanned<Expr>>),
    List(Vec<Spanned<Expr>>),
    /// `(+%)` used as a value.
    OperatorRef(Ident),
    /// Placeholder left behind by error recovery.
    Error,
}

// ============================================================================
// Display (fully parenthesized; used by `quill ast` and tests)
// ============================================================================

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[Spanned<T>], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", item.node)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Int(n) => write!(f, "{}", n),
            Expr::Float(x) => write!(f, "{:?}", x),
            Expr::Str(s) => write!(f, "{:?}", s),
            Expr::Var(name) | Expr::Constructor(name) => write!(f, "{}", name),
            Expr::Qualified { module, name } => write!(f, "{}.{}", module, name),
            Expr::Apply(func, args) => {
                write!(f, "({}", func.node)?;
                for arg in args {
                    write!(f, " {}", arg.node)?;
                }
                write!(f, ")")
            }
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", left.node, op.node, right.node),
            Expr::Negate(inner) => write!(f, "(-{})", inner.node),
            Expr::Lambda { params, body } => {
                write!(f, "(\\")?;
                write_list(f, params, " ")?;
                write!(f, " -> {})", body.node)
            }
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => write!(
                f,
                "(if {} then {} else {})",
                cond.node, then_branch.node, else_branch.node
            ),
            Expr::Let { pattern, value, body } => {
                write!(f, "(let {} = {} in {})", pattern.node, value.node, body.node)
            }
            Expr::Tuple(items) => {
                write!(f, "(")?;
                write_list(f, items, ", ")?;
                write!(f, ")")
            }
            Expr::List(items) => {
                write!(f, "[")?;
                write_list(f, items, ", ")?;
                write!(f, "]")
            }
            Expr::OperatorRef(op) => write!(f, "({})", op),
            Expr::Error => write!(f, "<error>"),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Var(name) => write!(f, "{}", name),
            Pattern::Wildcard => write!(f, "_"),
            Pattern::Int(n) => write!(f, "{}", n),
            Pattern::Str(s) => write!(f, "{:?}", s),
            Pattern::Tuple(items) => {
                write!(f, "(")?;
                write_list(f, items, ", ")?;
                write!(f, ")")
            }
            Pattern::Constructor { name, args } if args.is_empty() => write!(f, "{}", name),
            Pattern::Constructor { name, args } => {
                write!(f, "({}", name)?;
                for arg in args {
                    write!(f, " {}", arg.node)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Var(name) => write!(f, "{}", name),
            TypeExpr::Named { name, args } if args.is_empty() => write!(f, "{}", name),
            TypeExpr::Named { name, args } => {
                write!(f, "({}", name)?;
                for arg in args {
                    write!(f, " {}", arg.node)?;
                }
                write!(f, ")")
            }
            TypeExpr::Function(from, to) => write!(f, "({} -> {})", from.node, to.node),
            TypeExpr::Tuple(items) => {
                write!(f, "(")?;
                write_list(f, items, ", ")?;
                write!(f, ")")
            }
        }
    }
}
