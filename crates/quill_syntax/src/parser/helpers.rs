/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords, operators, and punctuation
/// - Layout handling (`skip_newlines`, `end_declaration`)
/// - Error recovery (`synchronize`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Run `parse` one nesting level deeper, failing once [`MAX_NESTING`] is reached.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T, CompileError>) -> Result<T, CompileError> {
        if self.depth >= MAX_NESTING {
            return Err(errors::nesting_too_deep(MAX_NESTING, self.current_span()));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &'a Token {
        self.tokens.get(self.pos).unwrap_or(&EOF_TOKEN)
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &'a Token {
        self.tokens.get(self.pos + 1).unwrap_or(&EOF_TOKEN)
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or_default()
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Span from `start` to the end of the most recently consumed token.
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.previous_span().end.max(start))
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, what: &str) -> Result<&'a Token, CompileError> {
        if self.check_keyword(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, what: &str) -> Result<&'a Token, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(what))
        }
    }

    /// Syntax error at the current token.
    fn unexpected(&self, expected: &str) -> CompileError {
        errors::unexpected_token(expected, &self.peek().kind.to_string(), self.current_span())
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek().kind, TokenKind::Newline) {
            self.advance();
        }
    }

    /// Require the current declaration to end here.
    ///
    /// Anything left before the next boundary is reported once and skipped.
    fn end_declaration(&mut self) {
        if !self.peek().kind.is_boundary() {
            let err = self.unexpected("end of declaration");
            self.errors.push(err);
            self.synchronize();
        }
        self.skip_newlines();
    }

    /// Skip to the next top-level boundary without consuming it.
    fn synchronize(&mut self) {
        while !self.peek().kind.is_boundary() {
            self.advance();
        }
    }

    /// Skip a declaration body in `SKIP_DEFINITIONS` mode.
    fn skip_declaration(&mut self) {
        self.synchronize();
    }

    /// Return `true` if the current token starts an `infix`/`infixl`/`infixr` declaration.
    fn is_at_fixity(&self) -> bool {
        self.check_keyword(KeywordId::Infix) || self.check_keyword(KeywordId::Infixl) || self.check_keyword(KeywordId::Infixr)
    }

    /// Return `true` if the current token is `(`, an operator, then `)`.
    fn is_at_operator_name(&self) -> bool {
        self.check_punct(PunctuationId::LParen)
            && self.peek_next().operator().is_some()
            && self
                .tokens
                .get(self.pos + 2)
                .is_some_and(|t| t.kind.is_punctuation(PunctuationId::RParen))
    }
}
