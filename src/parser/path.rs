//! Paths and generic argument lists

use super::{PResult, Parser};
use crate::ast::*;
use crate::grammar::{self, Lead, Position, Resolution};
use crate::lexer::TokenKind;

/// Where a path appears, which decides how `<` after it is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PathStyle {
    /// Generic arguments only through `::<`
    Expr,
    /// `Seg<` is tried as generic arguments first
    Type,
    /// `use` paths: no generic arguments, stops before `::*` and `::{`
    Mod,
}

impl PathStyle {
    fn position(self) -> Option<Position> {
        match self {
            PathStyle::Expr => Some(Position::Expr),
            PathStyle::Type => Some(Position::Type),
            PathStyle::Mod => None,
        }
    }
}

impl<'a> Parser<'a> {
    pub(super) fn parse_path(&mut self, style: PathStyle) -> PResult<Path> {
        let start = self.span();
        let global = self.eat(TokenKind::ColonColon);
        let mut segments = vec![self.parse_path_segment()?];

        loop {
            match self.peek() {
                TokenKind::ColonColon => match self.peek_n(1) {
                    TokenKind::Lt if style != PathStyle::Mod => {
                        let Some(Resolution::ByPosition(_)) =
                            grammar::resolution(Position::Expr, Lead::Turbofish)
                        else {
                            break;
                        };
                        self.advance();
                        let args = self.parse_generic_args()?;
                        self.attach_generics(&mut segments, args)?;
                    }
                    TokenKind::Star | TokenKind::LBrace if style == PathStyle::Mod => break,
                    kind if grammar::starts_path(kind) && kind != TokenKind::ColonColon => {
                        self.advance();
                        segments.push(self.parse_path_segment()?);
                    }
                    _ => {
                        self.advance();
                        return Err(self.unexpected("path segment"));
                    }
                },
                TokenKind::Lt => {
                    let resolution = style
                        .position()
                        .and_then(|position| grammar::resolution(position, Lead::PathLt));
                    match resolution {
                        Some(Resolution::Speculate { .. }) => match self.speculate_generic_args() {
                            Some(args) => self.attach_generics(&mut segments, args)?,
                            None => break,
                        },
                        _ => break,
                    }
                }
                _ => break,
            }
        }

        Ok(Path {
            id: self.next_id(),
            global,
            segments,
            span: start.to(self.prev_span()),
        })
    }

    fn parse_path_segment(&mut self) -> PResult<PathSegment> {
        let span = self.span();
        let kind = match self.peek() {
            TokenKind::Ident => PathSegmentKind::Ident(self.parse_ident()?),
            TokenKind::SelfValue => PathSegmentKind::SelfValue(self.advance()),
            TokenKind::Super => PathSegmentKind::Super(self.advance()),
            TokenKind::Party => PathSegmentKind::Party(self.advance()),
            _ => return Err(self.unexpected("path segment")),
        };
        Ok(PathSegment {
            kind,
            generics: None,
            span,
        })
    }

    fn attach_generics(&mut self, segments: &mut [PathSegment], args: GenericArgs) -> PResult<()> {
        let Some(last) = segments.last_mut() else {
            return Ok(());
        };
        if last.generics.is_some() {
            return Err(self.misplaced(
                args.span,
                "path segment already has generic arguments",
                None,
            ));
        }
        last.span = last.span.to(args.span);
        last.generics = Some(args);
        Ok(())
    }

    /// Tentatively read `<...>` after a type path segment
    ///
    /// The list is kept only if it parses and the token after `>` could not
    /// continue a comparison, or a line break ends the statement there;
    /// otherwise everything is rolled back.
    fn speculate_generic_args(&mut self) -> Option<GenericArgs> {
        let snapshot = self.snapshot();
        match self.parse_generic_args() {
            Ok(args)
                if self.newline_terminates() || !grammar::continues_comparison(self.peek()) =>
            {
                Some(args)
            }
            _ => {
                tracing::trace!(at = %self.span(), "generic arguments rolled back");
                self.restore(snapshot);
                None
            }
        }
    }

    pub(super) fn parse_generic_args(&mut self) -> PResult<GenericArgs> {
        let ((args, _), span) = self.delimited(
            TokenKind::Lt,
            TokenKind::Gt,
            "generic argument list",
            |p| p.comma_list(TokenKind::Gt, Self::parse_generic_arg),
        )?;
        Ok(GenericArgs { args, span })
    }

    fn parse_generic_arg(&mut self) -> PResult<GenericArg> {
        match self.peek() {
            TokenKind::Lifetime => Ok(GenericArg::Lifetime(self.parse_lifetime()?)),
            TokenKind::Ident if self.peek_n(1) == TokenKind::Eq => {
                let name = self.parse_ident()?;
                self.advance();
                let ty = self.parse_ty()?;
                let span = name.span.to(ty.span);
                Ok(GenericArg::Binding { name, ty, span })
            }
            kind if kind.is_literal() || matches!(kind, TokenKind::Minus | TokenKind::LBrace) => {
                Ok(GenericArg::Const(self.parse_const_arg()?))
            }
            _ => Ok(GenericArg::Type(self.parse_ty()?)),
        }
    }

    /// Constant operand inside angle brackets: a literal, a negated literal or
    /// a block. Bare binary expressions would swallow the closing `>`.
    pub(super) fn parse_const_arg(&mut self) -> PResult<Expr> {
        match self.peek() {
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                let span = block.span;
                Ok(self.mk_expr(ExprKind::Block(block), span))
            }
            TokenKind::Minus => {
                let start = self.advance();
                let lit = self.parse_lit()?;
                let operand = self.mk_expr(ExprKind::Lit(lit), lit.span);
                Ok(self.mk_expr(
                    ExprKind::Unary {
                        op: UnaryOp::Neg,
                        operand: Box::new(operand),
                    },
                    start.to(lit.span),
                ))
            }
            kind if grammar::starts_path(kind) => {
                let path = self.parse_path(PathStyle::Expr)?;
                let span = path.span;
                Ok(self.mk_expr(ExprKind::Path(path), span))
            }
            _ => {
                let lit = self.parse_lit()?;
                Ok(self.mk_expr(ExprKind::Lit(lit), lit.span))
            }
        }
    }
}
