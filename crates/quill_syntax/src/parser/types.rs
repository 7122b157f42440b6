/// Type and pattern parsing methods.
///
/// ## Notes
/// - Type annotations are parsed only so they can be skipped over cleanly and shown by tooling; nothing checks them.
/// - `pattern_atom` is what function parameters and lambda parameters use; constructor patterns with arguments need
///   parentheses there.
impl<'a> Parser<'a> {
    // ========================================================================
    // Types
    // ========================================================================

    /// `a -> b`, right-associative.
    fn type_expr(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        let from = self.type_app()?;
        if self.match_punct(PunctuationId::Arrow) {
            let to = self.nested(|p| p.type_expr())?;
            let span = from.span.merge(to.span);
            return Ok(Spanned::new(TypeExpr::Function(Box::new(from), Box::new(to)), span));
        }
        Ok(from)
    }

    /// `List a`
    fn type_app(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        if let TokenKind::UpperIdent(name) = &self.peek().kind {
            let start = self.current_span().start;
            self.advance();
            let mut args = Vec::new();
            while self.is_at_type_atom() {
                args.push(self.type_atom()?);
            }
            return Ok(Spanned::new(
                TypeExpr::Named {
                    name: name.clone(),
                    args,
                },
                self.span_from(start),
            ));
        }
        self.type_atom()
    }

    fn is_at_type_atom(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Ident(_) | TokenKind::UpperIdent(_)) || self.check_punct(PunctuationId::LParen)
    }

    fn type_atom(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        let start = self.current_span().start;
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Spanned::new(TypeExpr::Var(name.clone()), self.span_from(start)))
            }
            TokenKind::UpperIdent(name) => {
                self.advance();
                Ok(Spanned::new(
                    TypeExpr::Named {
                        name: name.clone(),
                        args: Vec::new(),
                    },
                    self.span_from(start),
                ))
            }
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                if self.match_punct(PunctuationId::RParen) {
                    return Ok(Spanned::new(TypeExpr::Tuple(Vec::new()), self.span_from(start)));
                }
                let first = self.nested(|p| p.type_expr())?;
                if !self.check_punct(PunctuationId::Comma) {
                    self.expect_punct(PunctuationId::RParen, "')' after the type")?;
                    return Ok(Spanned::new(first.node, self.span_from(start)));
                }
                let mut items = vec![first];
                while self.match_punct(PunctuationId::Comma) {
                    items.push(self.nested(|p| p.type_expr())?);
                }
                self.expect_punct(PunctuationId::RParen, "')' after the tuple type")?;
                Ok(Spanned::new(TypeExpr::Tuple(items), self.span_from(start)))
            }
            _ => Err(self.unexpected("a type")),
        }
    }

    // ========================================================================
    // Patterns
    // ========================================================================

    /// `Just x`, or any atomic pattern.
    fn pattern(&mut self) -> Result<Spanned<Pattern>, CompileError> {
        if let TokenKind::UpperIdent(name) = &self.peek().kind {
            let start = self.current_span().start;
            self.advance();
            let mut args = Vec::new();
            while self.is_at_pattern_atom() {
                args.push(self.pattern_atom()?);
            }
            return Ok(Spanned::new(
                Pattern::Constructor {
                    name: name.clone(),
                    args,
                },
                self.span_from(start),
            ));
        }
        self.pattern_atom()
    }

    fn is_at_pattern_atom(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Ident(_) | TokenKind::UpperIdent(_) | TokenKind::Int(_) | TokenKind::String(_)
        ) || self.check_punct(PunctuationId::LParen)
    }

    fn pattern_atom(&mut self) -> Result<Spanned<Pattern>, CompileError> {
        let start = self.current_span().start;
        let pattern = match &self.peek().kind {
            TokenKind::Ident(name) if name == "_" => {
                self.advance();
                Pattern::Wildcard
            }
            TokenKind::Ident(name) if !name.contains('.') => {
                self.advance();
                Pattern::Var(name.clone())
            }
            TokenKind::UpperIdent(name) => {
                self.advance();
                Pattern::Constructor {
                    name: name.clone(),
                    args: Vec::new(),
                }
            }
            TokenKind::Int(n) => {
                self.advance();
                Pattern::Int(*n)
            }
            TokenKind::String(s) => {
                self.advance();
                Pattern::Str(s.clone())
            }
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                if self.match_punct(PunctuationId::RParen) {
                    Pattern::Tuple(Vec::new())
                } else {
                    let first = self.nested(|p| p.pattern())?;
                    if self.check_punct(PunctuationId::Comma) {
                        let mut items = vec![first];
                        while self.match_punct(PunctuationId::Comma) {
                            items.push(self.nested(|p| p.pattern())?);
                        }
                        self.expect_punct(PunctuationId::RParen, "')' after the tuple pattern")?;
                        Pattern::Tuple(items)
                    } else {
                        self.expect_punct(PunctuationId::RParen, "')' after the pattern")?;
                        first.node
                    }
                }
            }
            _ => return Err(self.unexpected("a pattern")),
        };
        Ok(Spanned::new(pattern, self.span_from(start)))
    }
}
