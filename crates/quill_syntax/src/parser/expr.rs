/// Expression parsing methods.
///
/// Binary operators are not hard-coded: `binary_expr` implements precedence climbing over whatever fixities the
/// current [`FixityScope`] reports. Below the binary level the ladder is fixed:
/// binary → unary minus → application → atom.
///
/// ## Notes
/// - `\x -> e`, `if` and `let` are atoms that extend as far right as possible, so `f <| \x -> x + 1` needs no
///   parentheses.
/// - Many helpers here return [`Spanned<Expr>`] to preserve accurate spans for diagnostics.
impl<'a> Parser<'a> {
    // ========================================================================
    // Expressions
    // ========================================================================

    fn expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.nested(|p| p.binary_expr(0, None))
    }

    /// Precedence climbing.
    ///
    /// ## Parameters
    /// - `min_prec`: operators binding looser than this end the expression.
    /// - `parent`: the operator whose right operand is being parsed, used to reject ungroupable chains at equal
    ///   precedence (`a == b == c`, or mixing `infixl 0` with `infixr 0`).
    fn binary_expr(
        &mut self,
        min_prec: u8,
        parent: Option<(&'a str, Fixity)>,
    ) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.unary()?;
        let mut previous = parent;

        while let Some(op) = self.peek().operator() {
            let op_span = self.current_span();

            let Some(fixity) = self.operator_fixity(op, op_span) else {
                // Strict table, unknown operator: swallow the operator and its operand.
                self.advance();
                let right = self.application()?;
                left = Spanned::new(Expr::Error, left.span.merge(right.span));
                continue;
            };
            if fixity.precedence < min_prec {
                break;
            }

            if let Some((prev_op, prev_fixity)) = previous.filter(|(_, f)| f.precedence == fixity.precedence) {
                if prev_fixity.associativity != fixity.associativity {
                    self.errors.push(errors::mixed_associativity(
                        op,
                        fixity.associativity,
                        prev_op,
                        prev_fixity.associativity,
                        fixity.precedence,
                        op_span,
                    ));
                } else if fixity.associativity == Associativity::None {
                    self.errors.push(errors::non_associative_chain(op, prev_op, op_span));
                }
            }

            self.advance();
            let next_min = match fixity.associativity {
                Associativity::Right => fixity.precedence,
                Associativity::Left | Associativity::None => fixity.precedence.saturating_add(1),
            };
            let right = if next_min > MAX_PRECEDENCE {
                self.unary()?
            } else {
                self.nested(|p| p.binary_expr(next_min, Some((op, fixity))))?
            };

            let span = left.span.merge(right.span);
            left = Spanned::new(
                Expr::Binary {
                    op: Spanned::new(op.to_string(), op_span),
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
            previous = Some((op, fixity));
        }

        Ok(left)
    }

    /// Resolve an operator through the fixity scope, applying the unknown-operator policy.
    ///
    /// Returns `None` only for an unknown operator under the strict policy.
    fn operator_fixity(&mut self, op: &str, span: Span) -> Option<Fixity> {
        if let Some(fixity) = self.fixities.lookup(op) {
            return Some(fixity);
        }

        match self.fixities.policy() {
            UnknownOperatorPolicy::Lenient => {
                self.errors.push(errors::unknown_operator_defaulted(op, span));
                Some(Fixity::default_for_unknown())
            }
            UnknownOperatorPolicy::Strict => {
                self.errors.push(errors::unknown_operator(op, span));
                None
            }
        }
    }

    /// `-x`
    fn unary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        if self.peek().kind.is_operator("-") {
            let start = self.current_span().start;
            self.advance();
            let operand = self.nested(|p| p.unary())?;
            return Ok(Spanned::new(Expr::Negate(Box::new(operand)), self.span_from(start)));
        }
        self.application()
    }

    /// `f a b`
    fn application(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let func = self.atom()?;
        let mut args = Vec::new();
        while self.peek().kind.starts_atom() {
            args.push(self.atom()?);
        }
        if args.is_empty() {
            return Ok(func);
        }
        let span = func.span.merge(self.previous_span());
        Ok(Spanned::new(Expr::Apply(Box::new(func), args), span))
    }

    fn atom(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;
        let expr = match &self.peek().kind {
            TokenKind::Int(n) => {
                self.advance();
                Expr::Int(*n)
            }
            TokenKind::Float(x) => {
                self.advance();
                Expr::Float(*x)
            }
            TokenKind::String(s) => {
                self.advance();
                Expr::Str(s.clone())
            }
            TokenKind::Ident(name) => {
                self.advance();
                match name.rsplit_once('.') {
                    Some((module, value)) => Expr::Qualified {
                        module: module.to_string(),
                        name: value.to_string(),
                    },
                    None => Expr::Var(name.clone()),
                }
            }
            TokenKind::UpperIdent(name) => {
                self.advance();
                Expr::Constructor(name.clone())
            }
            TokenKind::Punctuation(PunctuationId::LParen) => return self.paren_expr(),
            TokenKind::Punctuation(PunctuationId::LBracket) => return self.list_expr(),
            TokenKind::Punctuation(PunctuationId::Backslash) => return self.lambda_expr(),
            TokenKind::Keyword(KeywordId::If) => return self.if_expr(),
            TokenKind::Keyword(KeywordId::Let) => return self.let_expr(),
            _ => return Err(self.unexpected("an expression")),
        };
        Ok(Spanned::new(expr, self.span_from(start)))
    }

    /// `(+%)`, `()`, `(e)`, or `(a, b)`
    fn paren_expr(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;

        if self.is_at_operator_name() {
            let op = self.operator_name()?;
            return Ok(Spanned::new(Expr::OperatorRef(op.node), op.span));
        }

        self.expect_punct(PunctuationId::LParen, "'('")?;
        if self.match_punct(PunctuationId::RParen) {
            return Ok(Spanned::new(Expr::Tuple(Vec::new()), self.span_from(start)));
        }

        let first = self.expression()?;
        if !self.check_punct(PunctuationId::Comma) {
            self.expect_punct(PunctuationId::RParen, "')'")?;
            return Ok(Spanned::new(first.node, self.span_from(start)));
        }

        let mut items = vec![first];
        while self.match_punct(PunctuationId::Comma) {
            items.push(self.expression()?);
        }
        self.expect_punct(PunctuationId::RParen, "',' or ')' in the tuple")?;
        Ok(Spanned::new(Expr::Tuple(items), self.span_from(start)))
    }

    fn list_expr(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;
        self.expect_punct(PunctuationId::LBracket, "'['")?;
        let mut items = Vec::new();
        if !self.check_punct(PunctuationId::RBracket) {
            items.push(self.expression()?);
            while self.match_punct(PunctuationId::Comma) {
                items.push(self.expression()?);
            }
        }
        self.expect_punct(PunctuationId::RBracket, "',' or ']' in the list")?;
        Ok(Spanned::new(Expr::List(items), self.span_from(start)))
    }

    /// `\x y -> body`
    fn lambda_expr(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;
        self.expect_punct(PunctuationId::Backslash, "'\\'")?;
        let mut params = vec![self.pattern_atom()?];
        while !self.check_punct(PunctuationId::Arrow) {
            params.push(self.pattern_atom()?);
        }
        self.expect_punct(PunctuationId::Arrow, "'->' after the lambda parameters")?;
        let body = self.expression()?;
        Ok(Spanned::new(
            Expr::Lambda {
                params,
                body: Box::new(body),
            },
            self.span_from(start),
        ))
    }

    fn if_expr(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;
        self.expect_keyword(KeywordId::If, "'if'")?;
        let cond = self.expression()?;
        self.expect_keyword(KeywordId::Then, "'then'")?;
        let then_branch = self.expression()?;
        self.expect_keyword(KeywordId::Else, "'else'")?;
        let else_branch = self.expression()?;
        Ok(Spanned::new(
            Expr::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            self.span_from(start),
        ))
    }

    /// `let pattern = value in body`
    fn let_expr(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span().start;
        self.expect_keyword(KeywordId::Let, "'let'")?;
        let pattern = self.pattern()?;
        self.expect_punct(PunctuationId::Eq, "'=' in the let binding")?;
        let value = self.expression()?;
        self.expect_keyword(KeywordId::In, "'in'")?;
        let body = self.expression()?;
        Ok(Spanned::new(
            Expr::Let {
                pattern,
                value: Box::new(value),
                body: Box::new(body),
            },
            self.span_from(start),
        ))
    }
}
