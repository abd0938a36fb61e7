//! Expressions
//!
//! Infix operators are parsed by precedence climbing over the operator
//! table. An operator is taken while its tier is at least the current
//! minimum, and its right operand is restricted to strictly tighter tiers, so
//! every tier folds to the left. Prefix operators and the postfix chain sit
//! above the infix tiers.

use super::path::PathStyle;
use super::ty::TyContext;
use super::{PResult, Parser};
use crate::ast::*;
use crate::diagnostics::ErrorGuaranteed;
use crate::grammar::{self, InfixOp, Interpretation, Lead, Position, Prec, Resolution};
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    pub(super) fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_expr_prec(Prec::LOWEST)
    }

    /// Expression whose top-level operators bind at least as tight as `min`
    pub(super) fn parse_expr_prec(&mut self, min: Prec) -> PResult<Expr> {
        self.nested(|p| {
            let mut lhs = p.parse_unary()?;
            loop {
                if p.newline_terminates() {
                    break;
                }
                let Some(def) = grammar::infix_operator(p.cursor.rest()) else {
                    break;
                };
                if def.prec < min {
                    break;
                }
                for _ in def.spelling {
                    p.advance();
                }
                let rhs_min = def.prec.tighter().unwrap_or(Prec::Path);
                lhs = match def.op {
                    InfixOp::Cast => {
                        let ty = p.parse_ty_in(TyContext::Cast)?;
                        let span = lhs.span.to(ty.span);
                        p.mk_expr(
                            ExprKind::Cast {
                                expr: Box::new(lhs),
                                ty: Box::new(ty),
                            },
                            span,
                        )
                    }
                    InfixOp::Binary(op) => {
                        let rhs = p.parse_expr_prec(rhs_min)?;
                        let span = lhs.span.to(rhs.span);
                        p.mk_expr(
                            ExprKind::Binary {
                                op,
                                lhs: Box::new(lhs),
                                rhs: Box::new(rhs),
                            },
                            span,
                        )
                    }
                    InfixOp::Assign(op) => {
                        let rhs = p.parse_expr_prec(rhs_min)?;
                        let span = lhs.span.to(rhs.span);
                        p.mk_expr(
                            ExprKind::Assign {
                                op,
                                lhs: Box::new(lhs),
                                rhs: Box::new(rhs),
                            },
                            span,
                        )
                    }
                };
            }
            Ok(lhs)
        })
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let start = self.span();
        if let Some(op) = grammar::prefix_operator(self.peek()) {
            self.advance();
            let operand = self.nested(Self::parse_unary)?;
            let span = start.to(operand.span);
            return Ok(self.mk_expr(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        if self.eat(TokenKind::Amp) {
            let mutable = self.eat(TokenKind::Mut);
            let operand = self.nested(Self::parse_unary)?;
            let span = start.to(operand.span);
            return Ok(self.mk_expr(
                ExprKind::Borrow {
                    mutable,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            expr = match self.peek() {
                TokenKind::Question => {
                    let end = self.advance();
                    let span = expr.span.to(end);
                    self.mk_expr(ExprKind::Try(Box::new(expr)), span)
                }
                TokenKind::LParen if !self.newline_terminates() => {
                    let ((args, _), end) = self.delimited(
                        TokenKind::LParen,
                        TokenKind::RParen,
                        "argument list",
                        |p| p.comma_list(TokenKind::RParen, Self::parse_arg),
                    )?;
                    let span = expr.span.to(end);
                    self.mk_expr(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    )
                }
                TokenKind::LBracket if !self.newline_terminates() => {
                    let ((indices, _), end) = self.delimited(
                        TokenKind::LBracket,
                        TokenKind::RBracket,
                        "index",
                        |p| p.comma_list(TokenKind::RBracket, Self::parse_expr),
                    )?;
                    let span = expr.span.to(end);
                    self.mk_expr(
                        ExprKind::Index {
                            base: Box::new(expr),
                            indices,
                        },
                        span,
                    )
                }
                TokenKind::Dot => {
                    self.advance();
                    self.parse_field(expr)?
                }
                _ => break,
            };
        }
        Ok(expr)
    }

    /// After `.`: a named field or a tuple index
    fn parse_field(&mut self, base: Expr) -> PResult<Expr> {
        match self.cursor.token().copied() {
            Some(token) if token.kind == TokenKind::Ident => {
                let field = self.parse_ident()?;
                let span = base.span.to(field.span);
                Ok(self.mk_expr(
                    ExprKind::Field {
                        base: Box::new(base),
                        field,
                    },
                    span,
                ))
            }
            Some(token) if token.kind == TokenKind::IntLit && token.suffix.is_none() => {
                let Ok(index) = self.interner.resolve(token.symbol).parse::<u32>() else {
                    return Err(self.unexpected("tuple index"));
                };
                self.advance();
                let span = base.span.to(token.span);
                Ok(self.mk_expr(
                    ExprKind::TupleField {
                        base: Box::new(base),
                        index,
                        index_span: token.span,
                    },
                    span,
                ))
            }
            _ => Err(self.unexpected("field name or tuple index")),
        }
    }

    /// `value` or `name: value`
    fn parse_arg(&mut self) -> PResult<Arg> {
        let start = self.span();
        let name = if self.at(TokenKind::Ident) && self.peek_n(1) == TokenKind::Colon {
            let name = self.parse_ident()?;
            self.advance();
            Some(name)
        } else {
            None
        };
        let value = self.parse_expr()?;
        let span = start.to(value.span);
        Ok(Arg { name, value, span })
    }

    pub(super) fn parse_lit(&mut self) -> PResult<Lit> {
        let kind = match self.peek() {
            TokenKind::True | TokenKind::False => LitKind::Bool,
            TokenKind::IntLit => LitKind::Int(IntBase::Dec),
            TokenKind::HexLit => LitKind::Int(IntBase::Hex),
            TokenKind::BinLit => LitKind::Int(IntBase::Bin),
            TokenKind::OctLit => LitKind::Int(IntBase::Oct),
            TokenKind::FloatLit => LitKind::Float,
            TokenKind::CharLit => LitKind::Char,
            TokenKind::StringLit => LitKind::Str,
            TokenKind::Error => {
                self.advance();
                return Err(ErrorGuaranteed::already_reported());
            }
            _ => return Err(self.unexpected("literal")),
        };
        match self.advance_token() {
            Some(token) => Ok(Lit {
                kind,
                symbol: token.symbol,
                suffix: token.suffix,
                span: token.span,
            }),
            None => Err(self.unexpected("literal")),
        }
    }

    // ==================== PRIMARY ====================

    pub(super) fn parse_primary(&mut self) -> PResult<Expr> {
        tracing::trace!(at = %self.span(), kind = %self.peek(), "primary");
        let start = self.span();
        match self.peek() {
            kind if kind.is_literal() => {
                let lit = self.parse_lit()?;
                Ok(self.mk_expr(ExprKind::Lit(lit), lit.span))
            }
            TokenKind::Ident => {
                let lambda = match grammar::resolution(Position::Expr, Lead::Ident) {
                    Some(Resolution::Lookahead { next, then, .. }) => {
                        then == Interpretation::Lambda && next.contains(&self.peek_n(1))
                    }
                    _ => false,
                };
                if lambda {
                    self.parse_ident_lambda()
                } else {
                    self.parse_path_expr()
                }
            }
            kind if grammar::starts_path(kind) => self.parse_path_expr(),
            TokenKind::LParen => self.parse_paren_expr(),
            TokenKind::LBracket => {
                let ((elems, _), span) = self.delimited(
                    TokenKind::LBracket,
                    TokenKind::RBracket,
                    "list",
                    |p| p.comma_list(TokenKind::RBracket, Self::parse_expr),
                )?;
                Ok(self.mk_expr(ExprKind::List(elems), span))
            }
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                let span = block.span;
                Ok(self.mk_expr(ExprKind::Block(block), span))
            }
            TokenKind::If => self.parse_if(TokenKind::If),
            TokenKind::Match => self.parse_match(),
            TokenKind::Loop => {
                self.advance();
                let body = self.parse_body("`loop`")?;
                let span = start.to(body.span());
                Ok(self.mk_expr(ExprKind::Loop { body }, span))
            }
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => {
                self.advance();
                let value = self.parse_jump_operand()?;
                let span = start.to(self.prev_span());
                Ok(self.mk_expr(ExprKind::Return(value), span))
            }
            TokenKind::Break => {
                self.advance();
                let value = self.parse_jump_operand()?;
                let span = start.to(self.prev_span());
                Ok(self.mk_expr(ExprKind::Break(value), span))
            }
            TokenKind::Continue => {
                let span = self.advance();
                Ok(self.mk_expr(ExprKind::Continue, span))
            }
            TokenKind::Error => {
                self.advance();
                Err(ErrorGuaranteed::already_reported())
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_path_expr(&mut self) -> PResult<Expr> {
        let path = self.parse_path(PathStyle::Expr)?;
        let span = path.span;
        Ok(self.mk_expr(ExprKind::Path(path), span))
    }

    fn parse_jump_operand(&mut self) -> PResult<Option<Box<Expr>>> {
        if grammar::can_begin_expr(self.peek()) && !self.newline_terminates() {
            Ok(Some(Box::new(self.parse_expr()?)))
        } else {
            Ok(None)
        }
    }

    /// `(`: a parenthesized lambda parameter list if an arrow follows the
    /// closing paren, otherwise unit, a parenthesized expression or a tuple
    fn parse_paren_expr(&mut self) -> PResult<Expr> {
        if let Some(Resolution::Speculate {
            attempt: Interpretation::Lambda,
            ..
        }) = grammar::resolution(Position::Expr, Lead::LParen)
        {
            if let Some(lambda) = self.speculate_paren_lambda()? {
                return Ok(lambda);
            }
        }

        let ((mut elems, trailing), span) = self.delimited(
            TokenKind::LParen,
            TokenKind::RParen,
            "parenthesized expression",
            |p| p.comma_list(TokenKind::RParen, Self::parse_expr),
        )?;
        let kind = match (grammar::arity(elems.len(), trailing), elems.pop()) {
            (Interpretation::Unit, _) | (_, None) => ExprKind::Unit,
            (Interpretation::Paren, Some(inner)) => ExprKind::Paren(Box::new(inner)),
            (_, Some(last)) => {
                elems.push(last);
                ExprKind::Tuple(elems)
            }
        };
        Ok(self.mk_expr(kind, span))
    }

    fn speculate_paren_lambda(&mut self) -> PResult<Option<Expr>> {
        let snapshot = self.snapshot();
        let params = self.delimited(
            TokenKind::LParen,
            TokenKind::RParen,
            "lambda parameters",
            |p| p.comma_list(TokenKind::RParen, Self::parse_lambda_param),
        );
        match params {
            Ok(((params, _), span)) if self.at(TokenKind::Arrow) => {
                self.advance();
                let body = self.parse_expr()?;
                let span = span.to(body.span);
                Ok(Some(self.mk_expr(
                    ExprKind::Lambda {
                        params,
                        body: Box::new(body),
                    },
                    span,
                )))
            }
            _ => {
                self.restore(snapshot);
                Ok(None)
            }
        }
    }

    fn parse_lambda_param(&mut self) -> PResult<LambdaParam> {
        let pat = self.parse_pat()?;
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_ty()?)
        } else {
            None
        };
        let span = pat.span.to(self.prev_span());
        Ok(LambdaParam { pat, ty, span })
    }

    /// `x -> body`
    fn parse_ident_lambda(&mut self) -> PResult<Expr> {
        let name = self.parse_ident()?;
        let pat = self.mk_pat(PatKind::Ident { name, sub: None }, name.span);
        self.expect(TokenKind::Arrow)?;
        let body = self.parse_expr()?;
        let span = name.span.to(body.span);
        Ok(self.mk_expr(
            ExprKind::Lambda {
                params: vec![LambdaParam {
                    pat,
                    ty: None,
                    span: name.span,
                }],
                body: Box::new(body),
            },
            span,
        ))
    }

    // ==================== CONTROL FLOW ====================

    /// Condition of `if`, `elif`, `while` and the subject of `match`
    fn parse_head(&mut self, keyword: &str) -> PResult<Expr> {
        let head = self.parse_expr()?;
        if self.config.lint_parens {
            if let ExprKind::Paren(_) = head.kind {
                self.lint(
                    head.span,
                    format!("unnecessary parentheses around {keyword} head"),
                );
            }
        }
        Ok(head)
    }

    /// Either-semicolon body: `;` or a block
    pub(super) fn parse_body(&mut self, owner: &str) -> PResult<Body> {
        match self.peek() {
            TokenKind::Semi => Ok(Body::Empty(self.advance())),
            TokenKind::LBrace => Ok(Body::Block(self.parse_block()?)),
            _ => Err(self.unexpected(format!("`;` or block after {owner}"))),
        }
    }

    /// `if`/`elif` chains; `keyword` is the token that opens this link
    fn parse_if(&mut self, keyword: TokenKind) -> PResult<Expr> {
        let start = self.expect(keyword)?;
        let cond = self.parse_head("`if`")?;
        let body = self.parse_body("`if` condition")?;
        let otherwise = match self.peek() {
            TokenKind::Elif => Some(Box::new(ElseBranch::Elif(self.parse_if(TokenKind::Elif)?))),
            TokenKind::Else => {
                self.advance();
                Some(Box::new(ElseBranch::Else(self.parse_body("`else`")?)))
            }
            _ => None,
        };
        let span = start.to(self.prev_span());
        Ok(self.mk_expr(
            ExprKind::If {
                cond: Box::new(cond),
                body,
                otherwise,
            },
            span,
        ))
    }

    fn parse_match(&mut self) -> PResult<Expr> {
        let start = self.expect(TokenKind::Match)?;
        let subject = Box::new(self.parse_head("`match`")?);
        if self.at(TokenKind::Semi) {
            let end = self.advance();
            return Ok(self.mk_expr(
                ExprKind::Match {
                    subject,
                    arms: Vec::new(),
                    elided: true,
                },
                start.to(end),
            ));
        }
        let (arms, end) = self.delimited(
            TokenKind::LBrace,
            TokenKind::RBrace,
            "match arms",
            Self::parse_arms,
        )?;
        Ok(self.mk_expr(
            ExprKind::Match {
                subject,
                arms,
                elided: false,
            },
            start.to(end),
        ))
    }

    fn parse_arms(&mut self) -> PResult<Vec<MatchArm>> {
        let mut arms = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            let start = self.cursor.pos();
            match self.parse_arm() {
                Ok(arm) => arms.push(arm),
                Err(_) if self.fatal => break,
                Err(_) => {
                    self.skip_to_separator(TokenKind::RBrace);
                    if self.cursor.pos() == start {
                        self.advance();
                    }
                }
            }
        }
        Ok(arms)
    }

    fn parse_arm(&mut self) -> PResult<MatchArm> {
        let start = self.span();
        let pats = self.parse_pat_alternatives()?;
        self.expect(TokenKind::FatArrow)?;
        let body = self.parse_expr()?;
        let block_like = body.kind.is_block_like();
        if !self.eat(TokenKind::Comma) && !self.at(TokenKind::RBrace) && !block_like {
            return Err(self.unexpected("`,` after match arm"));
        }
        let span = start.to(body.span);
        Ok(MatchArm {
            id: self.next_id(),
            pats,
            body,
            span,
        })
    }

    fn parse_while(&mut self) -> PResult<Expr> {
        let start = self.expect(TokenKind::While)?;
        if self.eat(TokenKind::Let) {
            let pat = Box::new(self.parse_pat()?);
            self.expect(TokenKind::Eq)?;
            let scrutinee = Box::new(self.parse_expr()?);
            let body = self.parse_body("`while let` head")?;
            let span = start.to(body.span());
            return Ok(self.mk_expr(
                ExprKind::WhileLet {
                    pat,
                    scrutinee,
                    body,
                },
                span,
            ));
        }
        let cond = Box::new(self.parse_head("`while`")?);
        let body = self.parse_body("`while` condition")?;
        let span = start.to(body.span());
        Ok(self.mk_expr(ExprKind::While { cond, body }, span))
    }

    fn parse_for(&mut self) -> PResult<Expr> {
        let start = self.expect(TokenKind::For)?;
        let pat = Box::new(self.parse_pat()?);
        self.expect(TokenKind::In)?;
        let iter = Box::new(self.parse_expr()?);
        let body = self.parse_body("`for` head")?;
        let span = start.to(body.span());
        Ok(self.mk_expr(ExprKind::For { pat, iter, body }, span))
    }
}
