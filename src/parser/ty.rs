//! Types

use super::path::PathStyle;
use super::{PResult, Parser};
use crate::ast::*;
use crate::diagnostics::ParseError;
use crate::grammar::{self, Interpretation, Lead, Position, Resolution};
use crate::lexer::TokenKind;

/// Where a type is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TyContext {
    Normal,
    /// Operand of `as`, where a `<` that is not a generic list is a comparison
    Cast,
}

impl<'a> Parser<'a> {
    pub(super) fn parse_ty(&mut self) -> PResult<Ty> {
        self.parse_ty_in(TyContext::Normal)
    }

    pub(super) fn parse_ty_in(&mut self, cx: TyContext) -> PResult<Ty> {
        self.nested(|p| p.parse_ty_inner(cx))
    }

    fn parse_ty_inner(&mut self, cx: TyContext) -> PResult<Ty> {
        let start = self.span();
        match self.peek() {
            TokenKind::Bang => {
                let span = self.advance();
                Ok(self.mk_ty(TyKind::Never, span))
            }
            TokenKind::LParen => self.parse_paren_ty(cx),
            TokenKind::LBracket => {
                let (kind, span) = self.delimited(
                    TokenKind::LBracket,
                    TokenKind::RBracket,
                    "array type",
                    |p| {
                        let elem = Box::new(p.parse_ty()?);
                        if p.eat(TokenKind::Semi) {
                            let len = Box::new(p.parse_expr()?);
                            Ok(TyKind::Array { elem, len })
                        } else {
                            Ok(TyKind::Slice(elem))
                        }
                    },
                )?;
                Ok(self.mk_ty(kind, span))
            }
            TokenKind::Amp => {
                self.advance();
                let inner = self.parse_ty_in(cx)?;
                let span = start.to(inner.span);
                Ok(self.mk_ty(TyKind::Ref(Box::new(inner)), span))
            }
            TokenKind::Mut => {
                self.advance();
                let inner = self.parse_ty_in(cx)?;
                let span = start.to(inner.span);
                Ok(self.mk_ty(TyKind::Mut(Box::new(inner)), span))
            }
            TokenKind::Ident if self.peek_n(1) != TokenKind::ColonColon => {
                let prim = self
                    .cursor
                    .token()
                    .and_then(|t| grammar::primitive_type(self.interner.resolve(t.symbol)));
                match prim {
                    Some(prim) => {
                        let span = self.advance();
                        Ok(self.mk_ty(TyKind::Prim(prim), span))
                    }
                    None => self.parse_path_ty(cx),
                }
            }
            kind if grammar::starts_path(kind) => self.parse_path_ty(cx),
            TokenKind::Error => {
                self.advance();
                Err(crate::diagnostics::ErrorGuaranteed::already_reported())
            }
            _ => Err(self.unexpected("type")),
        }
    }

    fn parse_path_ty(&mut self, cx: TyContext) -> PResult<Ty> {
        let path = self.parse_path(PathStyle::Type)?;
        if cx == TyContext::Normal && self.at(TokenKind::Lt) {
            let span = path.span.to(self.span());
            return Err(self.error(
                span,
                ParseError::AmbiguousConstruct {
                    construct: "generic argument list".to_string(),
                    span: span.into(),
                    help: Some(
                        "a type's generic arguments must be followed by a token that cannot \
                         continue a comparison; parenthesize the type or use `::<`"
                            .to_string(),
                    ),
                },
            ));
        }
        let span = path.span;
        Ok(self.mk_ty(TyKind::Path(path), span))
    }

    /// `()`, `(T)`, `(T,)`, `(A, B)` and function types `(A, B) -> R`
    fn parse_paren_ty(&mut self, cx: TyContext) -> PResult<Ty> {
        let ((mut elems, trailing), span) = self.delimited(
            TokenKind::LParen,
            TokenKind::RParen,
            "parenthesized type",
            |p| p.comma_list(TokenKind::RParen, Self::parse_ty),
        )?;

        if self.eat(TokenKind::Arrow) {
            let ret = self.parse_ty_in(cx)?;
            let span = span.to(ret.span);
            return Ok(self.mk_ty(
                TyKind::Func {
                    params: elems,
                    ret: Box::new(ret),
                },
                span,
            ));
        }

        let reading = match grammar::resolution(Position::Type, Lead::LParen) {
            Some(Resolution::Arity) => grammar::arity(elems.len(), trailing),
            _ => Interpretation::Tuple,
        };
        let kind = match (reading, elems.pop()) {
            (Interpretation::Unit, _) | (_, None) => TyKind::Unit,
            (Interpretation::Paren, Some(inner)) => TyKind::Paren(Box::new(inner)),
            (_, Some(last)) => {
                elems.push(last);
                TyKind::Tuple(elems)
            }
        };
        Ok(self.mk_ty(kind, span))
    }
}
