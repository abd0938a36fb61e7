//! Patterns

use super::path::PathStyle;
use super::{PResult, Parser};
use crate::ast::*;
use crate::diagnostics::ErrorGuaranteed;
use crate::grammar::{self, Interpretation, Lead, Position, Resolution};
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    pub(super) fn parse_pat(&mut self) -> PResult<Pat> {
        self.nested(Self::parse_pat_inner)
    }

    /// `p | q | ...` at the head of a match arm
    pub(super) fn parse_pat_alternatives(&mut self) -> PResult<Vec<Pat>> {
        self.eat(TokenKind::Pipe);
        let mut pats = vec![self.parse_pat()?];
        while self.eat(TokenKind::Pipe) {
            pats.push(self.parse_pat()?);
        }
        Ok(pats)
    }

    fn parse_pat_inner(&mut self) -> PResult<Pat> {
        let start = self.span();
        match self.peek() {
            TokenKind::Underscore => {
                let span = self.advance();
                Ok(self.mk_pat(PatKind::Wildcard, span))
            }
            TokenKind::DotDot => {
                let span = self.advance();
                Ok(self.mk_pat(PatKind::Rest, span))
            }
            TokenKind::Ref => {
                self.advance();
                let inner = self.parse_pat()?;
                let span = start.to(inner.span);
                Ok(self.mk_pat(PatKind::Ref(Box::new(inner)), span))
            }
            TokenKind::Mut => {
                self.advance();
                let inner = self.parse_pat()?;
                let span = start.to(inner.span);
                Ok(self.mk_pat(PatKind::Mut(Box::new(inner)), span))
            }
            TokenKind::Amp => {
                self.advance();
                let inner = self.parse_pat()?;
                let span = start.to(inner.span);
                Ok(self.mk_pat(PatKind::Borrow(Box::new(inner)), span))
            }
            TokenKind::Minus => {
                let lo = self.parse_lit_pat()?;
                self.maybe_range(lo)
            }
            kind if kind.is_literal() => {
                let lo = self.parse_lit_pat()?;
                self.maybe_range(lo)
            }
            TokenKind::LParen => self.parse_paren_pat(),
            TokenKind::LBracket => {
                let ((elems, _), span) = self.delimited(
                    TokenKind::LBracket,
                    TokenKind::RBracket,
                    "slice pattern",
                    |p| p.comma_list(TokenKind::RBracket, Self::parse_pat),
                )?;
                Ok(self.mk_pat(PatKind::Slice(elems), span))
            }
            TokenKind::Ident => {
                let next = self.peek_n(1);
                let reading = match grammar::resolution(Position::Pattern, Lead::Ident) {
                    Some(Resolution::Lookahead {
                        next: leads,
                        then,
                        otherwise,
                    }) => {
                        if leads.contains(&next) {
                            then
                        } else {
                            otherwise
                        }
                    }
                    _ => Interpretation::Binding,
                };
                if reading == Interpretation::PathPattern
                    || matches!(next, TokenKind::DotDot | TokenKind::DotDotEq)
                {
                    self.parse_path_pat()
                } else {
                    self.parse_binding()
                }
            }
            kind if grammar::starts_path(kind) => self.parse_path_pat(),
            TokenKind::Error => {
                self.advance();
                Err(ErrorGuaranteed::already_reported())
            }
            _ => Err(self.unexpected("pattern")),
        }
    }

    /// `name` or `name @ sub`
    fn parse_binding(&mut self) -> PResult<Pat> {
        let name = self.parse_ident()?;
        let sub = if self.eat(TokenKind::At) {
            Some(Box::new(self.parse_pat()?))
        } else {
            None
        };
        let span = name.span.to(self.prev_span());
        Ok(self.mk_pat(PatKind::Ident { name, sub }, span))
    }

    /// A literal, optionally negated
    fn parse_lit_pat(&mut self) -> PResult<Pat> {
        let start = self.span();
        let negated = self.eat(TokenKind::Minus);
        if negated && !self.peek().is_numeric_literal() {
            return Err(self.unexpected("numeric literal after `-`"));
        }
        let lit = self.parse_lit()?;
        let span = start.to(lit.span);
        Ok(self.mk_pat(PatKind::Lit { lit, negated }, span))
    }

    fn parse_path_pat(&mut self) -> PResult<Pat> {
        let path = self.parse_path(PathStyle::Expr)?;
        let start = path.span;
        match self.peek() {
            TokenKind::LParen => {
                let ((elems, _), span) = self.delimited(
                    TokenKind::LParen,
                    TokenKind::RParen,
                    "tuple struct pattern",
                    |p| p.comma_list(TokenKind::RParen, Self::parse_pat),
                )?;
                Ok(self.mk_pat(PatKind::TupleStruct { path, elems }, start.to(span)))
            }
            TokenKind::LBrace => {
                let ((fields, rest), span) = self.delimited(
                    TokenKind::LBrace,
                    TokenKind::RBrace,
                    "struct pattern",
                    Self::parse_field_pats,
                )?;
                Ok(self.mk_pat(PatKind::Struct { path, fields, rest }, start.to(span)))
            }
            _ => {
                let lo = self.mk_pat(PatKind::Path(path), start);
                self.maybe_range(lo)
            }
        }
    }

    fn parse_field_pats(&mut self) -> PResult<(Vec<FieldPat>, bool)> {
        let mut fields = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            if self.eat(TokenKind::DotDot) {
                return Ok((fields, true));
            }
            let name = self.parse_ident()?;
            let (pat, shorthand) = if self.eat(TokenKind::Colon) {
                (self.parse_pat()?, false)
            } else {
                let binding = self.mk_pat(PatKind::Ident { name, sub: None }, name.span);
                (binding, true)
            };
            let span = name.span.to(pat.span);
            fields.push(FieldPat {
                name,
                pat,
                shorthand,
                span,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok((fields, false))
    }

    /// `lo..hi` or `lo..=hi` when a range operator follows `lo`
    fn maybe_range(&mut self, lo: Pat) -> PResult<Pat> {
        let inclusive = match self.peek() {
            TokenKind::DotDot => false,
            TokenKind::DotDotEq => true,
            _ => return Ok(lo),
        };
        self.advance();
        let hi = match self.peek() {
            kind if kind.is_literal() || kind == TokenKind::Minus => self.parse_lit_pat()?,
            kind if grammar::starts_path(kind) => {
                let path = self.parse_path(PathStyle::Expr)?;
                let span = path.span;
                self.mk_pat(PatKind::Path(path), span)
            }
            _ => return Err(self.unexpected("range end")),
        };
        let span = lo.span.to(hi.span);
        Ok(self.mk_pat(
            PatKind::Range {
                lo: Box::new(lo),
                hi: Box::new(hi),
                inclusive,
            },
            span,
        ))
    }

    fn parse_paren_pat(&mut self) -> PResult<Pat> {
        let ((mut elems, trailing), span) = self.delimited(
            TokenKind::LParen,
            TokenKind::RParen,
            "parenthesized pattern",
            |p| p.comma_list(TokenKind::RParen, Self::parse_pat),
        )?;
        let reading = match grammar::resolution(Position::Pattern, Lead::LParen) {
            Some(Resolution::Arity) => grammar::arity(elems.len(), trailing),
            _ => Interpretation::Tuple,
        };
        let kind = match (reading, elems.pop()) {
            (Interpretation::Unit, _) | (_, None) => PatKind::Unit,
            (Interpretation::Paren, Some(inner)) => PatKind::Paren(Box::new(inner)),
            (_, Some(last)) => {
                elems.push(last);
                PatKind::Tuple(elems)
            }
        };
        Ok(self.mk_pat(kind, span))
    }
}
