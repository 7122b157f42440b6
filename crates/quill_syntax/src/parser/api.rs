/// Parse a token stream as one module, with infix expressions grouped according to `fixities`.
///
/// This never fails: syntax errors are recovered from and returned alongside whatever could be parsed.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `quill_syntax::lexer`.
/// - `mode`: `SKIP_DEFINITIONS` keeps only the header, imports and fixity declarations.
/// - `fixities`: the package operator table as seen from this module.
#[tracing::instrument(skip_all, fields(token_count = tokens.len(), module = fixities.module()))]
pub fn parse_module(tokens: &[Token], mode: ParseMode, fixities: FixityScope<'_>) -> Parsed {
    Parser::new(tokens, mode, fixities).module()
}

/// Parse a self-contained module.
///
/// The module's own fixity declarations are honoured; operators from other modules are unknown and parse with the
/// default fixity. Warnings are dropped.
///
/// ## Errors
/// Returns every error-severity diagnostic if there was at least one.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Module, Vec<CompileError>> {
    let (empty, _) = OperatorTable::builtin().freeze();
    let header = parse_module(tokens, ParseMode::SKIP_DEFINITIONS, empty.scope(""));
    let name = header.module.name().unwrap_or_default().to_string();

    let mut table = OperatorTable::builtin();
    let mut errors: Vec<CompileError> = table
        .define_module(&name, &header.module)
        .iter()
        .map(|e| e.to_diagnostic())
        .collect();
    let (table, _) = table.freeze();

    let parsed = parse_module(tokens, ParseMode::FULL_PARSE, table.scope(&name));
    errors.extend(parsed.errors);
    errors.retain(CompileError::is_error);

    if errors.is_empty() {
        Ok(parsed.module)
    } else {
        Err(errors)
    }
}
