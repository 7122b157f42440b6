/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type and its top-level `module()` entrypoint.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.

/// Output of [`parse_module`]: always a module, plus whatever went wrong on the way.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub module: Module,
    /// Errors and warnings in source order.
    pub errors: Vec<CompileError>,
}

impl Parsed {
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(CompileError::is_error)
    }
}

/// Deepest nesting of parentheses, brackets, right operands and type arrows the parser follows before giving up on
/// an expression.
pub const MAX_NESTING: usize = 200;

static EOF_TOKEN: Token = Token {
    kind: TokenKind::Eof,
    span: Span { start: 0, end: 0 },
};

/// Parser state.
///
/// ## Notes
/// - The parser recovers from errors by synchronizing at top-level declaration boundaries (`Newline` tokens).
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    mode: ParseMode,
    fixities: FixityScope<'a>,
    errors: Vec<CompileError>,
    /// Current recursion depth, see [`MAX_NESTING`].
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `quill_syntax::lexer`.
    /// - `mode`: `SKIP_DEFINITIONS` stops after fixity declarations; other flags are ignored here.
    /// - `fixities`: the operator table as seen from the module being parsed.
    pub fn new(tokens: &'a [Token], mode: ParseMode, fixities: FixityScope<'a>) -> Self {
        Self {
            tokens,
            pos: 0,
            mode,
            fixities,
            errors: Vec::new(),
            depth: 0,
        }
    }

    /// Parse the entire token stream into a [`Module`], recovering from errors.
    pub fn module(mut self) -> Parsed {
        let mut module = Module::default();

        self.skip_newlines();
        if self.check_keyword(KeywordId::Module) {
            match self.module_header() {
                Ok(header) => module.header = Some(header),
                Err(e) => {
                    self.errors.push(e);
                    self.synchronize();
                }
            }
            self.end_declaration();
        } else {
            self.errors.push(CompileError::syntax(
                format!("Expected 'module' declaration, found {}", self.peek().kind),
                self.current_span(),
            ));
        }

        while !self.is_at_end() {
            if self.check_keyword(KeywordId::Import) {
                if !module.declarations.is_empty() {
                    self.errors.push(CompileError::syntax(
                        "Imports must come before declarations",
                        self.current_span(),
                    ));
                }
                match self.import_decl() {
                    Ok(import) => module.imports.push(import),
                    Err(e) => {
                        self.errors.push(e);
                        self.synchronize();
                    }
                }
            } else if self.is_at_fixity() {
                match self.infix_decl() {
                    Ok(decl) => module.declarations.push(decl),
                    Err(e) => {
                        self.errors.push(e);
                        self.synchronize();
                    }
                }
            } else if self.mode.is(ParseMode::SKIP_DEFINITIONS) {
                self.skip_declaration();
            } else {
                match self.declaration() {
                    Ok(decl) => module.declarations.push(decl),
                    Err(e) => {
                        self.errors.push(e);
                        self.synchronize();
                    }
                }
            }
            self.end_declaration();
        }

        Parsed {
            module,
            errors: self.errors,
        }
    }
}
