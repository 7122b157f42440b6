/// Miscellaneous parser utilities.
impl<'a> Parser<'a> {
    // ========================================================================
    // Utilities
    // ========================================================================

    /// `(+%)`; the span covers the parentheses.
    fn operator_name(&mut self) -> Result<Spanned<Ident>, CompileError> {
        let start = self.current_span().start;
        self.expect_punct(PunctuationId::LParen, "'('")?;
        let op = match self.peek().operator() {
            Some(op) => op.to_string(),
            None => return Err(self.unexpected("an operator")),
        };
        self.advance();
        self.expect_punct(PunctuationId::RParen, "')' after the operator")?;
        Ok(Spanned::new(op, self.span_from(start)))
    }
}
