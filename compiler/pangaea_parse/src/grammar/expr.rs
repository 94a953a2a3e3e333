use pangaea_ir::{AdditionalChain, Chain, Expr, ExprKind, MainChain, Name, Span};
use pangaea_lexer::Token;
use pangaea_stack::ensure_sufficient_stack;

use super::{PResult, Parser};

/// Binding power of infix operators, loosest first.
fn infix_level(token: &Token) -> Option<u8> {
    Some(match token {
        Token::OrOr => 0,
        Token::AndAnd => 1,
        Token::EqEq
        | Token::NotEq
        | Token::Lt
        | Token::LtEq
        | Token::Gt
        | Token::GtEq
        | Token::Spaceship => 2,
        Token::BitOr | Token::BitXor => 3,
        Token::BitAnd => 4,
        Token::Shl | Token::Shr => 5,
        Token::Plus | Token::Minus => 6,
        Token::Star | Token::Slash | Token::SlashSlash | Token::Percent => 7,
        Token::StarStar => 8,
        _ => return None,
    })
}

fn is_prefix_op(token: &Token) -> bool {
    matches!(
        token,
        Token::Minus | Token::Plus | Token::Bang | Token::BitNot | Token::Star | Token::StarStar
    )
}

fn is_main_chain(token: Option<&Token>) -> bool {
    matches!(token, Some(Token::Dot | Token::At | Token::Dollar))
}

impl Parser<'_> {
    /// `then if cond else otherwise`, or anything tighter.
    pub(super) fn parse_expr(&mut self) -> PResult<Expr> {
        ensure_sufficient_stack(|| {
            let then = self.parse_assign()?;
            if !self.cursor.eat(&Token::If) {
                return Ok(then);
            }
            let cond = self.parse_assign()?;
            let otherwise = if self.cursor.eat(&Token::Else) {
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            let src = then.src.clone();
            Ok(Expr::new(
                ExprKind::If {
                    then: Box::new(then),
                    cond: Box::new(cond),
                    otherwise,
                },
                src,
            ))
        })
    }

    /// `a := e`, `a op= e`, `e => a`.
    pub(super) fn parse_assign(&mut self) -> PResult<Expr> {
        if let Some(Token::Ident(target)) = self.cursor.peek() {
            let target = Name::intern(target);
            match self.cursor.peek_nth(1) {
                Some(Token::ColonEq) => {
                    let src = self.src(self.cursor.span());
                    self.cursor.advance();
                    self.cursor.advance();
                    self.cursor.skip_newlines();
                    let value = self.parse_expr()?;
                    return Ok(Expr::new(
                        ExprKind::Assign {
                            target,
                            value: Box::new(value),
                        },
                        src,
                    ));
                }
                Some(Token::CompoundAssign(op)) => {
                    let op = Name::intern(op);
                    let src = self.src(self.cursor.span());
                    self.cursor.advance();
                    self.cursor.advance();
                    self.cursor.skip_newlines();
                    let rhs = self.parse_expr()?;
                    let current = Expr::new(ExprKind::Ident(target), src.clone());
                    let value = Expr::new(
                        ExprKind::Infix {
                            op,
                            left: Box::new(current),
                            right: Box::new(rhs),
                        },
                        src.clone(),
                    );
                    return Ok(Expr::new(
                        ExprKind::Assign {
                            target,
                            value: Box::new(value),
                        },
                        src,
                    ));
                }
                _ => {}
            }
        }

        let mut expr = self.parse_binary(0)?;
        while self.cursor.check(&Token::FatArrow) {
            let src = self.src(self.cursor.span());
            self.cursor.advance();
            let target = self.expect_ident("variable name after `=>`")?.0;
            expr = Expr::new(
                ExprKind::Assign {
                    target,
                    value: Box::new(expr),
                },
                src,
            );
        }
        Ok(expr)
    }

    /// Precedence climbing over [`infix_level`]; `**` is right-associative.
    pub(super) fn parse_binary(&mut self, min_level: u8) -> PResult<Expr> {
        let mut left = self.parse_chain()?;
        loop {
            let Some(level) = self.cursor.peek().and_then(infix_level) else {
                break;
            };
            if level < min_level {
                break;
            }
            let span = self.cursor.span();
            let Some(tok) = self.cursor.advance() else {
                break;
            };
            let op = Name::intern(tok.value.op_str().unwrap_or_default());
            self.cursor.skip_newlines();
            let next_min = if tok.value == Token::StarStar {
                level
            } else {
                level + 1
            };
            let right = self.parse_binary(next_min)?;
            left = Expr::new(
                ExprKind::Infix {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                self.src(span),
            );
        }
        Ok(left)
    }

    /// A unary operand followed by any number of chain calls and subscripts.
    fn parse_chain(&mut self) -> PResult<Expr> {
        let mut expr = if self.at_chain_start() {
            self.parse_chain_call(None)?
        } else {
            self.parse_unary()?
        };
        loop {
            expr = self.parse_subscripts(expr)?;
            if !self.at_chain_start() {
                return Ok(expr);
            }
            expr = self.parse_chain_call(Some(expr))?;
        }
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        ensure_sufficient_stack(|| {
            if self.cursor.peek().is_some_and(is_prefix_op) {
                let span = self.cursor.span();
                let op = self
                    .cursor
                    .advance()
                    .and_then(|t| t.value.op_str())
                    .unwrap_or_default();
                let right = self.parse_unary()?;
                return Ok(self.prefix(op, right, span));
            }
            let primary = self.parse_primary()?;
            self.parse_subscripts(primary)
        })
    }

    /// `*e` / `**e` in element and argument position, where the operand is a full expression.
    pub(super) fn parse_unpack_or_expr(&mut self) -> PResult<Expr> {
        let op = match self.cursor.peek() {
            Some(Token::Star) => "*",
            Some(Token::StarStar) => "**",
            _ => return self.parse_expr(),
        };
        let span = self.cursor.span();
        self.cursor.advance();
        let right = self.parse_expr()?;
        Ok(self.prefix(op, right, span))
    }

    fn prefix(&self, op: &str, right: Expr, span: Span) -> Expr {
        Expr::new(
            ExprKind::Prefix {
                op: Name::intern(op),
                right: Box::new(right),
            },
            self.src(span),
        )
    }

    pub(super) fn at_chain_start(&self) -> bool {
        match self.cursor.peek() {
            Some(Token::Dot | Token::At | Token::Dollar) => true,
            Some(Token::Amp | Token::Tilde | Token::Eq) => is_main_chain(self.cursor.peek_nth(1)),
            _ => false,
        }
    }

    /// `recv.prop(args)`, `recv.{|x| ...}`, `recv.^f`, with optional additional chain and chain arg.
    pub(super) fn parse_chain_call(&mut self, receiver: Option<Expr>) -> PResult<Expr> {
        let chain_span = self.cursor.span();
        let additional = match self.cursor.peek() {
            Some(Token::Amp) => AdditionalChain::Lonely,
            Some(Token::Tilde) => AdditionalChain::Thoughtful,
            Some(Token::Eq) => AdditionalChain::Strict,
            _ => AdditionalChain::Vanilla,
        };
        if additional != AdditionalChain::Vanilla {
            self.cursor.advance();
        }
        let main = match self.cursor.advance().map(|t| t.value) {
            Some(Token::Dot) => MainChain::Scalar,
            Some(Token::At) => MainChain::List,
            Some(Token::Dollar) => MainChain::Reduce,
            _ => return Err(self.cursor.unexpected("chain")),
        };

        let arg = if self.cursor.check(&Token::LParen) && self.cursor.adjacent() {
            self.cursor.advance();
            self.cursor.skip_newlines();
            let arg = self.parse_expr()?;
            self.cursor.skip_newlines();
            self.cursor.expect(&Token::RParen, "`)` after chain argument")?;
            Some(Box::new(arg))
        } else {
            None
        };
        let chain = Chain {
            main,
            additional,
            arg,
        };
        let src = receiver
            .as_ref()
            .map_or_else(|| self.src(chain_span), |r| r.src.clone());
        let receiver = receiver.map(Box::new);

        match self.cursor.peek() {
            Some(Token::LBrace) => {
                let open = self.cursor.span();
                self.cursor.advance();
                let func = self.parse_func_component(open, false)?;
                Ok(Expr::new(
                    ExprKind::LiteralCall {
                        chain,
                        receiver,
                        func,
                    },
                    src,
                ))
            }
            Some(Token::Ident(m)) if m == "m" && self.cursor.peek_nth(1) == Some(&Token::LBrace) => {
                self.cursor.advance();
                let open = self.cursor.span();
                self.cursor.advance();
                let func = self.parse_func_component(open, true)?;
                Ok(Expr::new(
                    ExprKind::LiteralCall {
                        chain,
                        receiver,
                        func,
                    },
                    src,
                ))
            }
            Some(Token::Caret) => {
                self.cursor.advance();
                let var = self.expect_ident("variable name after `^`")?.0;
                Ok(Expr::new(
                    ExprKind::VarCall {
                        chain,
                        receiver,
                        var,
                    },
                    src,
                ))
            }
            _ => {
                let prop = self.expect_prop_name()?;
                let (mut args, kwargs) = if self.cursor.check(&Token::LParen) && self.cursor.adjacent() {
                    self.parse_call_args()?
                } else {
                    (Vec::new(), Vec::new())
                };
                while self.func_literal_ahead() {
                    let open = self.cursor.span();
                    self.cursor.advance();
                    let func = self.parse_func_component(open, false)?;
                    let func_src = self.src(open);
                    args.push(Expr::new(ExprKind::Func(func), func_src));
                }
                Ok(Expr::new(
                    ExprKind::PropCall {
                        chain,
                        receiver,
                        prop,
                        args,
                        kwargs,
                    },
                    src,
                ))
            }
        }
    }

    /// `x[...]` and adjacent `x(...)`.
    fn parse_subscripts(&mut self, mut expr: Expr) -> PResult<Expr> {
        loop {
            match self.cursor.peek() {
                Some(Token::LBracket) => {
                    let open = self.cursor.span();
                    self.cursor.advance();
                    let elems = self.parse_index_elems()?;
                    let src = expr.src.clone();
                    let index = Expr::new(ExprKind::Arr(elems), self.src(open));
                    expr = Expr::new(
                        ExprKind::PropCall {
                            chain: Chain::scalar(),
                            receiver: Some(Box::new(expr)),
                            prop: Name::intern("at"),
                            args: vec![index],
                            kwargs: Vec::new(),
                        },
                        src,
                    );
                }
                Some(Token::LParen) if self.cursor.adjacent() => {
                    let (args, kwargs) = self.parse_call_args()?;
                    let src = expr.src.clone();
                    expr = Expr::new(
                        ExprKind::PropCall {
                            chain: Chain::scalar(),
                            receiver: Some(Box::new(expr)),
                            prop: Name::intern("call"),
                            args,
                            kwargs,
                        },
                        src,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Elements between `[` and `]` of an index; bare ranges `a:b:c` allowed.
    fn parse_index_elems(&mut self) -> PResult<Vec<Expr>> {
        let mut elems = Vec::new();
        loop {
            self.cursor.skip_newlines();
            if self.cursor.eat(&Token::RBracket) {
                return Ok(elems);
            }
            let span = self.cursor.span();
            let start = if self.cursor.check(&Token::Colon) {
                None
            } else {
                Some(self.parse_expr()?)
            };
            let elem = if self.cursor.check(&Token::Colon) {
                self.parse_range_rest(start, span, &Token::RBracket)?
            } else {
                start.ok_or_else(|| self.cursor.unexpected("index"))?
            };
            elems.push(elem);
            self.cursor.skip_newlines();
            if !self.cursor.eat(&Token::Comma) {
                self.cursor.skip_newlines();
                self.cursor.expect(&Token::RBracket, "`]`")?;
                return Ok(elems);
            }
        }
    }

    /// Parses `:stop[:step]` after a range start; the cursor sits on the first `:`.
    pub(super) fn parse_range_rest(
        &mut self,
        start: Option<Expr>,
        span: Span,
        closer: &Token,
    ) -> PResult<Expr> {
        self.cursor.expect(&Token::Colon, "`:`")?;
        let part = |p: &mut Self| -> PResult<Option<Box<Expr>>> {
            if p.cursor.check(&Token::Colon) || p.cursor.check(&Token::Comma) || p.cursor.check(closer) {
                Ok(None)
            } else {
                Ok(Some(Box::new(p.parse_expr()?)))
            }
        };
        let stop = part(self)?;
        let step = if self.cursor.eat(&Token::Colon) {
            part(self)?
        } else {
            None
        };
        Ok(Expr::new(
            ExprKind::Range {
                start: start.map(Box::new),
                stop,
                step,
            },
            self.src(span),
        ))
    }

    /// `(args, k: v, *a, **o)`; the cursor sits on `(`.
    pub(super) fn parse_call_args(&mut self) -> PResult<(Vec<Expr>, Vec<(Name, Expr)>)> {
        self.cursor.expect(&Token::LParen, "`(`")?;
        let mut args = Vec::new();
        let mut kwargs = Vec::new();
        loop {
            self.cursor.skip_newlines();
            if self.cursor.eat(&Token::RParen) {
                break;
            }
            if let (Some(Token::Ident(key)), Some(Token::Colon)) =
                (self.cursor.peek(), self.cursor.peek_nth(1))
            {
                let key = Name::intern(key);
                self.cursor.advance();
                self.cursor.advance();
                self.cursor.skip_newlines();
                kwargs.push((key, self.parse_expr()?));
            } else {
                args.push(self.parse_unpack_or_expr()?);
            }
            self.cursor.skip_newlines();
            if !self.cursor.eat(&Token::Comma) {
                self.cursor.skip_newlines();
                self.cursor.expect(&Token::RParen, "`)`")?;
                break;
            }
        }
        Ok((args, kwargs))
    }

    /// Prop names are identifiers or operator spellings (`.+(1)`, `$(0)+`).
    fn expect_prop_name(&mut self) -> PResult<Name> {
        let name = match self.cursor.peek() {
            Some(Token::Ident(s)) => Name::intern(s),
            Some(tok) => match tok.op_str() {
                Some(op) => Name::intern(op),
                None => return Err(self.cursor.unexpected("property name")),
            },
            None => return Err(self.cursor.unexpected("property name")),
        };
        self.cursor.advance();
        Ok(name)
    }

    pub(super) fn expect_ident(&mut self, expected: &'static str) -> PResult<(Name, Span)> {
        match self.cursor.peek() {
            Some(Token::Ident(s) | Token::ScopedIdent(s)) => {
                let name = Name::intern(s);
                let span = self.cursor.span();
                self.cursor.advance();
                Ok((name, span))
            }
            _ => Err(self.cursor.unexpected(expected)),
        }
    }

    /// `{|` or `{||` ahead.
    pub(super) fn func_literal_ahead(&self) -> bool {
        self.cursor.check(&Token::LBrace)
            && matches!(self.cursor.peek_nth(1), Some(Token::Pipe | Token::OrOr))
    }
}

