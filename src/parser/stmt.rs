//! Blocks and statements

use super::{PResult, Parser};
use crate::ast::*;
use crate::grammar::{self, Interpretation, Lead, Position, Resolution};
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    pub(super) fn parse_block(&mut self) -> PResult<Block> {
        self.nested(|p| {
            let (stmts, span) =
                p.delimited(TokenKind::LBrace, TokenKind::RBrace, "block", |p| {
                    let mut stmts = Vec::new();
                    while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
                        stmts.push(p.parse_stmt());
                    }
                    Ok(stmts)
                })?;
            Ok(Block {
                id: p.next_id(),
                stmts,
                span,
            })
        })
    }

    /// One statement; a malformed one becomes `StmtKind::Error` spanning the
    /// tokens skipped to reach the next synchronization point
    pub(super) fn parse_stmt(&mut self) -> Stmt {
        let start_pos = self.cursor.pos();
        let start = self.span();
        tracing::trace!(at = %start, kind = %self.peek(), "statement");
        match self.parse_stmt_kind() {
            Ok(kind) => {
                let span = start.to(self.prev_span());
                self.mk_stmt(kind, span)
            }
            Err(_) => {
                self.synchronize(start_pos);
                let span = start.to(self.prev_span());
                self.mk_stmt(StmtKind::Error, span)
            }
        }
    }

    fn parse_stmt_kind(&mut self) -> PResult<StmtKind> {
        let kind = self.peek();
        let lead = if grammar::starts_item(kind) {
            Some(Lead::ItemKeyword)
        } else if kind == TokenKind::Ident {
            Some(Lead::Ident)
        } else {
            None
        };
        let reading = lead
            .and_then(|lead| grammar::resolution(Position::Stmt, lead))
            .and_then(|resolution| match resolution {
                Resolution::ByPosition(reading) => Some(reading),
                _ => None,
            });
        if reading == Some(Interpretation::Item) {
            return Ok(StmtKind::Item(Box::new(self.parse_item()?)));
        }

        match kind {
            TokenKind::Semi => {
                self.advance();
                Ok(StmtKind::Empty)
            }
            TokenKind::Let => self.parse_let(),
            TokenKind::If
            | TokenKind::Match
            | TokenKind::Loop
            | TokenKind::While
            | TokenKind::For
            | TokenKind::LBrace => {
                // A block-like expression ends the statement at its closing brace
                let expr = self.parse_primary()?;
                let terminated = self.eat(TokenKind::Semi);
                Ok(StmtKind::Expr { expr, terminated })
            }
            _ => {
                let expr = self.parse_expr()?;
                self.finish_expr_stmt(expr)
            }
        }
    }

    /// Terminate an expression statement; an unterminated expression right
    /// before `}` is the value of the enclosing block
    fn finish_expr_stmt(&mut self, expr: Expr) -> PResult<StmtKind> {
        if self.eat(TokenKind::Semi) {
            return Ok(StmtKind::Expr {
                expr,
                terminated: true,
            });
        }
        if self.at(TokenKind::RBrace) {
            return Ok(StmtKind::Expr {
                expr,
                terminated: false,
            });
        }
        self.expect_terminator("expression")?;
        Ok(StmtKind::Expr {
            expr,
            terminated: true,
        })
    }

    fn parse_let(&mut self) -> PResult<StmtKind> {
        self.expect(TokenKind::Let)?;
        let pat = self.parse_pat()?;
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_ty()?)
        } else {
            None
        };
        let init = if self.eat(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect_terminator("`let` statement")?;
        Ok(StmtKind::Let(Box::new(Local { pat, ty, init })))
    }
}
