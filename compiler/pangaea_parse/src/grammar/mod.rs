//! Grammar rules.
//!
//! - `mod.rs`: statements and statement lists
//! - `expr.rs`: operators, chains, subscripts
//! - `literal.rs`: primaries, collections, strings, func literals

mod expr;
mod literal;

use pangaea_ir::{Expr, ExprKind, JumpKind, LineIndex, Program, Source, Span, Stmt, StmtKind};
use pangaea_lexer::Token;

use crate::cursor::Cursor;
use crate::ParseError;

pub(crate) type PResult<T> = Result<T, ParseError>;

pub(crate) struct Parser<'a> {
    cursor: Cursor,
    lines: &'a LineIndex,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(cursor: Cursor, lines: &'a LineIndex) -> Self {
        Parser { cursor, lines }
    }

    fn src(&self, span: Span) -> Source {
        self.lines.source(span)
    }

    pub(crate) fn parse_program(&mut self) -> PResult<Program> {
        let stmts = self.parse_stmts(|_| false)?;
        if !self.cursor.at_end() {
            return Err(self.cursor.unexpected("statement"));
        }
        Ok(Program { stmts })
    }

    /// Statements separated by newlines or `;`, up to (not including) a closer.
    fn parse_stmts(&mut self, is_closer: fn(&Token) -> bool) -> PResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            while matches!(self.cursor.peek(), Some(Token::Newline | Token::Semicolon)) {
                self.cursor.advance();
            }
            match self.cursor.peek() {
                None => break,
                Some(t) if is_closer(t) => break,
                Some(_) => {}
            }

            stmts.push(self.parse_stmt()?);

            match self.cursor.peek() {
                None | Some(Token::Newline | Token::Semicolon) => {}
                Some(t) if is_closer(t) => break,
                Some(_) => return Err(self.cursor.unexpected("newline or `;`")),
            }
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> PResult<Stmt> {
        let src = self.src(self.cursor.span());
        let kind = match self.cursor.peek() {
            Some(Token::Return) => JumpKind::Return,
            Some(Token::Raise) => JumpKind::Raise,
            Some(Token::Yield) => JumpKind::Yield,
            Some(Token::Defer) => JumpKind::Defer,
            _ => {
                let expr = self.parse_expr()?;
                return Ok(Stmt {
                    kind: StmtKind::Expr(expr),
                    src,
                });
            }
        };
        self.cursor.advance();

        let value = if self.at_stmt_end() || self.cursor.check(&Token::If) {
            None
        } else {
            Some(self.parse_assign()?)
        };

        if !self.cursor.eat(&Token::If) {
            return Ok(Stmt {
                kind: StmtKind::Jump { kind, value },
                src,
            });
        }

        let cond = self.parse_assign()?;
        if !self.cursor.check(&Token::Else) {
            return Ok(Stmt {
                kind: StmtKind::JumpIf { kind, value, cond },
                src,
            });
        }

        // `return a if c else b` jumps unconditionally with an if-expression
        let else_span = self.cursor.span();
        self.cursor.advance();
        let otherwise = self.parse_expr()?;
        let Some(then) = value else {
            return Err(ParseError::Unexpected {
                found: "else".into(),
                expected: "a value before `if`",
                span: else_span,
            });
        };
        let if_src = then.src.clone();
        let value = Expr::new(
            ExprKind::If {
                then: Box::new(then),
                cond: Box::new(cond),
                otherwise: Some(Box::new(otherwise)),
            },
            if_src,
        );
        Ok(Stmt {
            kind: StmtKind::Jump {
                kind,
                value: Some(value),
            },
            src,
        })
    }

    fn at_stmt_end(&self) -> bool {
        matches!(
            self.cursor.peek(),
            None | Some(Token::Newline | Token::Semicolon | Token::RBrace | Token::IterClose)
        )
    }
}
