use std::rc::Rc;

use pangaea_ir::{Expr, ExprKind, FuncComponent, Name, Pair, Span, StrSegment};
use pangaea_lexer::{str_pieces, tokenize, unescape, StrPiece, Token};

use super::{PResult, Parser};
use crate::cursor::Cursor;

impl Parser<'_> {
    pub(super) fn parse_primary(&mut self) -> PResult<Expr> {
        let span = self.cursor.span();
        let Some(tok) = self.cursor.peek().cloned() else {
            return Err(self.cursor.unexpected("expression"));
        };
        let kind = match tok {
            Token::Int(i) => {
                self.cursor.advance();
                ExprKind::Int(i)
            }
            Token::Float(x) => {
                self.cursor.advance();
                ExprKind::Float(x)
            }
            Token::Str(raw) => {
                self.cursor.advance();
                return self.parse_str(&raw, span);
            }
            Token::RawStr(text) => {
                self.cursor.advance();
                ExprKind::Str {
                    value: text.clone(),
                    text,
                    raw: true,
                }
            }
            Token::Char(c) => {
                self.cursor.advance();
                ExprKind::Str {
                    value: unescape(&c),
                    text: c,
                    raw: false,
                }
            }
            Token::Sym(s) => {
                self.cursor.advance();
                ExprKind::Sym(s)
            }
            Token::Ident(ref m) if m == "m" && self.cursor.peek_nth(1) == Some(&Token::LBrace) => {
                self.cursor.advance();
                let open = self.cursor.span();
                self.cursor.advance();
                ExprKind::Func(self.parse_func_component(open, true)?)
            }
            Token::Ident(s) | Token::ScopedIdent(s) => {
                self.cursor.advance();
                ExprKind::Ident(Name::intern(&s))
            }
            Token::Caret => {
                self.cursor.advance();
                ExprKind::PinnedIdent(self.expect_ident("variable name after `^`")?.0)
            }
            Token::LParen => {
                self.cursor.advance();
                return self.parse_paren(span);
            }
            Token::LBracket => {
                self.cursor.advance();
                ExprKind::Arr(self.parse_elems(&Token::RBracket, "`]`")?)
            }
            Token::LBrace => {
                self.cursor.advance();
                if matches!(self.cursor.peek(), Some(Token::Pipe | Token::OrOr)) {
                    ExprKind::Func(self.parse_func_component(span, false)?)
                } else {
                    let (pairs, embedded) = self.parse_pairs(&Token::RBrace, true)?;
                    ExprKind::Obj { pairs, embedded }
                }
            }
            Token::MapOpen => {
                self.cursor.advance();
                let (pairs, embedded) = self.parse_pairs(&Token::RBrace, false)?;
                ExprKind::Map { pairs, embedded }
            }
            Token::IterOpen => {
                self.cursor.advance();
                ExprKind::Iter(self.parse_func_parts(span, false, &Token::IterClose)?)
            }
            Token::Diamond => {
                self.cursor.advance();
                ExprKind::Diamond
            }
            _ => return Err(self.cursor.unexpected("expression")),
        };
        Ok(Expr::new(kind, self.src(span)))
    }

    /// `(e)` or a range `(start:stop:step)`; the cursor sits after `(`.
    fn parse_paren(&mut self, open: Span) -> PResult<Expr> {
        self.cursor.skip_newlines();
        let start = if self.cursor.check(&Token::Colon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.cursor.skip_newlines();
        let expr = if self.cursor.check(&Token::Colon) {
            self.parse_range_rest(start, open, &Token::RParen)?
        } else {
            start.ok_or_else(|| self.cursor.unexpected("expression"))?
        };
        self.cursor.skip_newlines();
        self.cursor.expect(&Token::RParen, "`)`")?;
        Ok(expr)
    }

    /// Comma-separated elements up to `closer`; `*e` and `**e` are allowed.
    fn parse_elems(&mut self, closer: &Token, expected: &'static str) -> PResult<Vec<Expr>> {
        let mut elems = Vec::new();
        loop {
            self.cursor.skip_newlines();
            if self.cursor.eat(closer) {
                return Ok(elems);
            }
            elems.push(self.parse_unpack_or_expr()?);
            self.cursor.skip_newlines();
            if !self.cursor.eat(&Token::Comma) {
                self.cursor.skip_newlines();
                self.cursor.expect(closer, expected)?;
                return Ok(elems);
            }
        }
    }

    /// Key-value pairs of an obj or map literal, plus `**e` embeds.
    ///
    /// In obj literals a bare identifier key stands for its own name.
    fn parse_pairs(&mut self, closer: &Token, obj: bool) -> PResult<(Vec<Pair>, Vec<Expr>)> {
        let mut pairs = Vec::new();
        let mut embedded = Vec::new();
        loop {
            self.cursor.skip_newlines();
            if self.cursor.eat(closer) {
                return Ok((pairs, embedded));
            }
            if self.cursor.eat(&Token::StarStar) {
                embedded.push(self.parse_expr()?);
            } else {
                let key_span = self.cursor.span();
                let key = match self.cursor.peek() {
                    Some(Token::Ident(name))
                        if obj && self.cursor.peek_nth(1) == Some(&Token::Colon) =>
                    {
                        let name = name.clone();
                        self.cursor.advance();
                        Expr::new(
                            ExprKind::Str {
                                value: name.clone(),
                                text: name,
                                raw: false,
                            },
                            self.src(key_span),
                        )
                    }
                    _ => self.parse_binary(0)?,
                };
                self.cursor.expect(&Token::Colon, "`:` after key")?;
                self.cursor.skip_newlines();
                let value = self.parse_expr()?;
                pairs.push(Pair { key, value });
            }
            self.cursor.skip_newlines();
            if !self.cursor.eat(&Token::Comma) {
                self.cursor.skip_newlines();
                self.cursor.expect(closer, "`}`")?;
                return Ok((pairs, embedded));
            }
        }
    }

    /// Params and body of `{|a, k: v| ...}` or `<{|a| ...}>`; the cursor sits after the opener.
    ///
    /// `method` prepends a `self` param, as in `m{|a| ...}`.
    pub(super) fn parse_func_component(
        &mut self,
        open: Span,
        method: bool,
    ) -> PResult<Rc<FuncComponent>> {
        self.parse_func_parts(open, method, &Token::RBrace)
    }

    fn parse_func_parts(
        &mut self,
        open: Span,
        method: bool,
        closer: &Token,
    ) -> PResult<Rc<FuncComponent>> {
        let mut params = Vec::new();
        let mut kwargs = Vec::new();
        if method {
            params.push(Name::intern("self"));
        }
        if self.cursor.eat(&Token::Pipe) {
            loop {
                self.cursor.skip_newlines();
                if self.cursor.eat(&Token::Pipe) {
                    break;
                }
                let (name, _) = self.expect_ident("parameter name")?;
                if self.cursor.eat(&Token::Colon) {
                    kwargs.push((name, self.parse_binary(0)?));
                } else {
                    params.push(name);
                }
                self.cursor.skip_newlines();
                if !self.cursor.eat(&Token::Comma) {
                    self.cursor.expect(&Token::Pipe, "`|`")?;
                    break;
                }
            }
        } else {
            self.cursor.eat(&Token::OrOr);
        }

        let body = if *closer == Token::IterClose {
            let body = self.parse_stmts(|t| matches!(t, Token::IterClose))?;
            self.cursor.expect(&Token::IterClose, "`}>`")?;
            body
        } else {
            let body = self.parse_stmts(|t| matches!(t, Token::RBrace))?;
            self.cursor.expect(&Token::RBrace, "`}`")?;
            body
        };
        Ok(Rc::new(FuncComponent {
            params,
            kwargs,
            body: Rc::from(body),
            src: self.src(open),
        }))
    }

    /// Double-quoted string; `#{ }` holes become an embedded string.
    fn parse_str(&mut self, raw: &str, span: Span) -> PResult<Expr> {
        let pieces = str_pieces(raw);
        if let [StrPiece::Text(text)] = pieces.as_slice() {
            return Ok(Expr::new(
                ExprKind::Str {
                    value: unescape(text),
                    text: (*text).to_string(),
                    raw: false,
                },
                self.src(span),
            ));
        }

        let mut segments = Vec::new();
        let mut pending = String::new();
        let mut tail = String::new();
        for piece in pieces {
            match piece {
                StrPiece::Text(text) => {
                    pending = text.to_string();
                    tail = pending.clone();
                }
                StrPiece::Hole { code, offset } => {
                    let base = span.start as usize + 1 + offset;
                    let expr = self.parse_hole(code, base)?;
                    segments.push(StrSegment {
                        text: unescape(&std::mem::take(&mut pending)),
                        expr,
                    });
                    tail.clear();
                }
            }
        }
        Ok(Expr::new(
            ExprKind::EmbeddedStr {
                segments,
                tail: unescape(&tail),
            },
            self.src(span),
        ))
    }

    fn parse_hole(&mut self, code: &str, base: usize) -> PResult<Expr> {
        let tokens = tokenize(code, base)?;
        let mut sub = Parser::new(Cursor::new(tokens, base + code.len()), self.lines);
        sub.cursor.skip_newlines();
        let expr = sub.parse_expr()?;
        sub.cursor.skip_newlines();
        if !sub.cursor.at_end() {
            return Err(sub.cursor.unexpected("`}` closing embedded expression"));
        }
        Ok(expr)
    }
}
