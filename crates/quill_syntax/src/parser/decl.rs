/// Declaration parsing methods.
///
/// This chunk is responsible for the module header, imports, fixity declarations, type annotations and value
/// definitions.
///
/// ## Notes
/// - Most entrypoints in this file return [`Spanned<T>`] to preserve source locations.
/// - Error recovery is handled by `Parser::synchronize()` (in `helpers.rs`).
impl<'a> Parser<'a> {
    // ========================================================================
    // Header and imports
    // ========================================================================

    fn module_header(&mut self) -> Result<Spanned<ModuleHeader>, CompileError> {
        let start = self.current_span().start;
        self.expect_keyword(KeywordId::Module, "'module'")?;
        let name = self.module_name()?;
        self.expect_keyword(KeywordId::Exposing, "'exposing' after the module name")?;
        let exposing = self.exposing()?;
        Ok(Spanned::new(ModuleHeader { name: name.node, exposing }, self.span_from(start)))
    }

    fn import_decl(&mut self) -> Result<Spanned<ImportDecl>, CompileError> {
        let start = self.current_span().start;
        self.expect_keyword(KeywordId::Import, "'import'")?;
        let module = self.module_name()?;

        let alias = if self.match_keyword(KeywordId::As) {
            match &self.peek().kind {
                TokenKind::UpperIdent(alias) if !alias.contains('.') => {
                    self.advance();
                    Some(alias.clone())
                }
                _ => return Err(self.unexpected("a capitalized alias after 'as'")),
            }
        } else {
            None
        };

        let exposing = if self.match_keyword(KeywordId::Exposing) {
            Some(self.exposing()?)
        } else {
            None
        };

        Ok(Spanned::new(
            ImportDecl {
                module,
                alias,
                exposing,
            },
            self.span_from(start),
        ))
    }

    /// `Math.Vector`
    fn module_name(&mut self) -> Result<Spanned<Ident>, CompileError> {
        match &self.peek().kind {
            TokenKind::UpperIdent(name) => {
                let span = self.current_span();
                self.advance();
                Ok(Spanned::new(name.clone(), span))
            }
            _ => Err(self.unexpected("a module name")),
        }
    }

    /// `(..)` or `(item, item, ...)`
    fn exposing(&mut self) -> Result<Spanned<Exposing>, CompileError> {
        let start = self.current_span().start;
        self.expect_punct(PunctuationId::LParen, "'(' to start the exposing list")?;

        if self.match_punct(PunctuationId::DotDot) {
            self.expect_punct(PunctuationId::RParen, "')' after '..'")?;
            return Ok(Spanned::new(Exposing::All, self.span_from(start)));
        }

        let mut items = vec![self.exposed_item()?];
        while self.match_punct(PunctuationId::Comma) {
            items.push(self.exposed_item()?);
        }
        self.expect_punct(PunctuationId::RParen, "',' or ')' in the exposing list")?;
        Ok(Spanned::new(Exposing::Items(items), self.span_from(start)))
    }

    fn exposed_item(&mut self) -> Result<Spanned<ExposedItem>, CompileError> {
        let start = self.current_span().start;
        let item = match &self.peek().kind {
            TokenKind::Ident(name) if !name.contains('.') => {
                self.advance();
                ExposedItem::Value(name.clone())
            }
            TokenKind::UpperIdent(name) if !name.contains('.') => {
                self.advance();
                let constructors = self.check_punct(PunctuationId::LParen)
                    && self.peek_next().kind.is_punctuation(PunctuationId::DotDot);
                if constructors {
                    self.advance();
                    self.advance();
                    self.expect_punct(PunctuationId::RParen, "')' after '(..'")?;
                }
                ExposedItem::Type {
                    name: name.clone(),
                    constructors,
                }
            }
            _ if self.is_at_operator_name() => ExposedItem::Operator(self.operator_name()?.node),
            _ => return Err(self.unexpected("a name or '(operator)' in the exposing list")),
        };
        Ok(Spanned::new(item, self.span_from(start)))
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// `infixl 6 +%`
    fn infix_decl(&mut self) -> Result<Spanned<Declaration>, CompileError> {
        let start = self.current_span().start;
        let associativity = match self.advance().keyword_id() {
            Some(KeywordId::Infixl) => Associativity::Left,
            Some(KeywordId::Infixr) => Associativity::Right,
            _ => Associativity::None,
        };

        let precedence = match self.peek().kind {
            TokenKind::Int(n) if (0..=i64::from(MAX_PRECEDENCE)).contains(&n) => {
                self.advance();
                n as u8
            }
            TokenKind::Int(n) => {
                return Err(CompileError::fixity(
                    format!("Precedence {} is outside 0..={}", n, MAX_PRECEDENCE),
                    self.current_span(),
                ));
            }
            _ => return Err(self.unexpected(&format!("a precedence after '{}'", associativity.keyword()))),
        };

        let operator = match self.peek().operator() {
            Some(op) => {
                let span = self.current_span();
                self.advance();
                Spanned::new(op.to_string(), span)
            }
            None if self.is_at_operator_name() => self.operator_name()?,
            None => return Err(self.unexpected("an operator")),
        };

        Ok(Spanned::new(
            Declaration::Infix(InfixDecl {
                associativity,
                precedence,
                operator,
            }),
            self.span_from(start),
        ))
    }

    /// Type annotation or value definition.
    fn declaration(&mut self) -> Result<Spanned<Declaration>, CompileError> {
        let start = self.current_span().start;

        let name = match &self.peek().kind {
            TokenKind::Ident(name) if !name.contains('.') => {
                let span = self.current_span();
                self.advance();
                Spanned::new(DeclName::Value(name.clone()), span)
            }
            TokenKind::Ident(name) => {
                return Err(CompileError::syntax(
                    format!("Cannot define the qualified name '{}'", name),
                    self.current_span(),
                ));
            }
            _ if self.is_at_operator_name() => {
                let op = self.operator_name()?;
                Spanned::new(DeclName::Operator(op.node), op.span)
            }
            _ => return Err(self.unexpected("a declaration")),
        };

        let decl = if self.match_punct(PunctuationId::Colon) {
            let ty = self.type_expr()?;
            Declaration::Annotation(Annotation { name: name.node, ty })
        } else {
            let mut params = Vec::new();
            while !self.check_punct(PunctuationId::Eq) && !self.peek().kind.is_boundary() {
                params.push(self.pattern_atom()?);
            }
            self.expect_punct(PunctuationId::Eq, "'=' in the definition")?;
            let body = self.expression()?;
            Declaration::Value(ValueDecl { name, params, body })
        };

        Ok(Spanned::new(decl, self.span_from(start)))
    }
}
