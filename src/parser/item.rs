//! Items and the file level

use super::path::PathStyle;
use super::{PResult, Parser};
use crate::ast::*;
use crate::common::Span;
use crate::grammar;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    // ==================== FILE ====================

    pub(super) fn parse_file(&mut self) -> File {
        let mut items = Vec::new();
        while !self.at(TokenKind::Eof) {
            items.push(self.parse_item_or_error());
        }
        File {
            items,
            span: Span::new(0, self.span().end),
        }
    }

    /// One item; a malformed one becomes `ItemKind::Error`
    fn parse_item_or_error(&mut self) -> Item {
        let start_pos = self.cursor.pos();
        let start = self.span();
        match self.parse_item() {
            Ok(item) => item,
            Err(_) => {
                self.synchronize(start_pos);
                Item {
                    id: self.next_id(),
                    vis: Visibility::Private,
                    kind: ItemKind::Error,
                    span: start.to(self.prev_span()),
                }
            }
        }
    }

    pub(super) fn parse_item(&mut self) -> PResult<Item> {
        let start = self.span();
        tracing::trace!(at = %start, kind = %self.peek(), "item");
        let vis = if self.at(TokenKind::Pub) {
            Visibility::Public(self.advance())
        } else {
            Visibility::Private
        };

        let kind = match self.peek() {
            TokenKind::Func => ItemKind::Func(self.parse_func()?),
            TokenKind::Struct => ItemKind::Struct(self.parse_struct()?),
            TokenKind::Enum => ItemKind::Enum(self.parse_enum()?),
            TokenKind::Type => ItemKind::TypeAlias(self.parse_type_alias()?),
            TokenKind::Mod => ItemKind::Mod(self.parse_mod()?),
            TokenKind::Use => {
                self.advance();
                let tree = self.parse_use_tree()?;
                self.expect_terminator("`use` declaration")?;
                ItemKind::Use(tree)
            }
            TokenKind::Trait => ItemKind::Trait(self.parse_trait()?),
            TokenKind::Impl => ItemKind::Impl(self.parse_impl()?),
            TokenKind::Const => ItemKind::Const(self.parse_const()?),
            kind if vis == Visibility::Private && grammar::can_begin_expr(kind) => {
                let expr = self.parse_expr()?;
                return Err(self.misplaced(
                    expr.span,
                    "expressions are not allowed at item level",
                    Some("move the expression into a function body"),
                ));
            }
            _ => return Err(self.unexpected("item")),
        };

        Ok(Item {
            id: self.next_id(),
            vis,
            kind,
            span: start.to(self.prev_span()),
        })
    }

    /// `{ item* }` of modules, traits and impls
    fn parse_item_list(&mut self, construct: &'static str) -> PResult<Vec<Item>> {
        let (items, _) = self.delimited(TokenKind::LBrace, TokenKind::RBrace, construct, |p| {
            let mut items = Vec::new();
            while !p.at(TokenKind::RBrace) && !p.at(TokenKind::Eof) {
                items.push(p.parse_item_or_error());
            }
            Ok(items)
        })?;
        Ok(items)
    }

    /// `;` or `{ item* }`
    fn parse_members(&mut self, construct: &'static str) -> PResult<Option<Vec<Item>>> {
        if self.eat(TokenKind::Semi) {
            Ok(None)
        } else {
            Ok(Some(self.parse_item_list(construct)?))
        }
    }

    // ==================== GENERICS ====================

    fn parse_generics(&mut self) -> PResult<Option<Generics>> {
        if !self.at(TokenKind::Lt) {
            return Ok(None);
        }
        let ((params, _), span) = self.delimited(
            TokenKind::Lt,
            TokenKind::Gt,
            "generic parameter list",
            |p| p.comma_list(TokenKind::Gt, Self::parse_generic_param),
        )?;
        Ok(Some(Generics { params, span }))
    }

    fn parse_generic_param(&mut self) -> PResult<GenericParam> {
        let start = self.span();
        let kind = match self.peek() {
            TokenKind::Lifetime => GenericParamKind::Lifetime(self.parse_lifetime()?),
            TokenKind::Const => {
                self.advance();
                let name = self.parse_ident()?;
                self.expect(TokenKind::Colon)?;
                let ty = self.parse_ty()?;
                let default = if self.eat(TokenKind::Eq) {
                    Some(self.parse_const_arg()?)
                } else {
                    None
                };
                GenericParamKind::Const { name, ty, default }
            }
            _ => {
                let name = self.parse_ident()?;
                let bound = if self.eat(TokenKind::Colon) {
                    Some(self.parse_ty()?)
                } else {
                    None
                };
                GenericParamKind::Type { name, bound }
            }
        };
        Ok(GenericParam {
            kind,
            span: start.to(self.prev_span()),
        })
    }

    // ==================== FUNCTIONS ====================

    fn parse_func(&mut self) -> PResult<FuncDef> {
        self.expect(TokenKind::Func)?;
        let name = self.parse_ident()?;
        let generics = self.parse_generics()?;
        let ((params, _), _) = self.delimited(
            TokenKind::LParen,
            TokenKind::RParen,
            "parameter list",
            |p| p.comma_list(TokenKind::RParen, Self::parse_param),
        )?;

        let ret = match self.peek() {
            TokenKind::Colon => {
                self.advance();
                Some(self.parse_ty()?)
            }
            TokenKind::Arrow => {
                let arrow = self.advance();
                let _ = self.misplaced(
                    arrow,
                    "return types are annotated with `:`",
                    Some("replace `->` with `:`"),
                );
                Some(self.parse_ty()?)
            }
            _ => None,
        };

        let body = match self.peek() {
            TokenKind::Semi => FuncBody::Empty(self.advance()),
            TokenKind::LBrace => FuncBody::Block(self.parse_block()?),
            TokenKind::Eq => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect_terminator("function body")?;
                FuncBody::Expr(Box::new(expr))
            }
            _ => return Err(self.unexpected("function body")),
        };

        Ok(FuncDef {
            name,
            generics,
            params,
            ret,
            body,
        })
    }

    /// `pat: Type [= default]`
    fn parse_param(&mut self) -> PResult<Param> {
        let pat = self.parse_pat()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_ty()?;
        let default = if self.eat(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let span = pat.span.to(self.prev_span());
        Ok(Param {
            id: self.next_id(),
            pat,
            ty,
            default,
            span,
        })
    }

    // ==================== DATA TYPES ====================

    fn parse_struct(&mut self) -> PResult<StructDef> {
        self.expect(TokenKind::Struct)?;
        let name = self.parse_ident()?;
        let generics = self.parse_generics()?;
        let fields = if self.eat(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_fields("struct fields")?)
        };
        Ok(StructDef {
            name,
            generics,
            fields,
        })
    }

    fn parse_fields(&mut self, construct: &'static str) -> PResult<Vec<FieldDef>> {
        let ((fields, _), _) = self.delimited(
            TokenKind::LBrace,
            TokenKind::RBrace,
            construct,
            |p| p.comma_list(TokenKind::RBrace, Self::parse_field_def),
        )?;
        Ok(fields)
    }

    fn parse_field_def(&mut self) -> PResult<FieldDef> {
        let start = self.span();
        let vis = if self.at(TokenKind::Pub) {
            Visibility::Public(self.advance())
        } else {
            Visibility::Private
        };
        let name = self.parse_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_ty()?;
        Ok(FieldDef {
            id: self.next_id(),
            vis,
            name,
            span: start.to(ty.span),
            ty,
        })
    }

    fn parse_enum(&mut self) -> PResult<EnumDef> {
        self.expect(TokenKind::Enum)?;
        let name = self.parse_ident()?;
        let generics = self.parse_generics()?;
        let variants = if self.eat(TokenKind::Semi) {
            None
        } else {
            let ((variants, _), _) = self.delimited(
                TokenKind::LBrace,
                TokenKind::RBrace,
                "enum variants",
                |p| p.comma_list(TokenKind::RBrace, Self::parse_variant),
            )?;
            Some(variants)
        };
        Ok(EnumDef {
            name,
            generics,
            variants,
        })
    }

    fn parse_variant(&mut self) -> PResult<Variant> {
        let name = self.parse_ident()?;
        let kind = match self.peek() {
            TokenKind::Eq => {
                self.advance();
                VariantKind::Discriminant(self.parse_expr()?)
            }
            TokenKind::LParen => {
                let ((types, _), _) = self.delimited(
                    TokenKind::LParen,
                    TokenKind::RParen,
                    "variant fields",
                    |p| p.comma_list(TokenKind::RParen, Self::parse_ty),
                )?;
                VariantKind::Tuple(types)
            }
            TokenKind::LBrace => VariantKind::Struct(self.parse_fields("variant fields")?),
            _ => VariantKind::Unit,
        };
        Ok(Variant {
            id: self.next_id(),
            name,
            kind,
            span: name.span.to(self.prev_span()),
        })
    }

    fn parse_type_alias(&mut self) -> PResult<TypeAliasDef> {
        self.expect(TokenKind::Type)?;
        let name = self.parse_ident()?;
        let generics = self.parse_generics()?;
        self.expect(TokenKind::Eq)?;
        let ty = self.parse_ty()?;
        self.expect_terminator("type alias")?;
        Ok(TypeAliasDef { name, generics, ty })
    }

    fn parse_const(&mut self) -> PResult<ConstDef> {
        self.expect(TokenKind::Const)?;
        let name = self.parse_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_ty()?;
        let value = if self.eat(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect_terminator("constant")?;
        Ok(ConstDef { name, ty, value })
    }

    // ==================== MODULES ====================

    fn parse_mod(&mut self) -> PResult<ModDef> {
        self.expect(TokenKind::Mod)?;
        let name = self.parse_ident()?;
        let items = self.parse_members("module")?;
        Ok(ModDef { name, items })
    }

    /// `path [as name]`, `[path::]*` or `[path::]{tree, ...}`
    fn parse_use_tree(&mut self) -> PResult<UseTree> {
        let start = self.span();
        let prefix = if grammar::starts_path(self.peek())
            && !(self.at(TokenKind::ColonColon)
                && matches!(self.peek_n(1), TokenKind::Star | TokenKind::LBrace))
        {
            let path = self.parse_path(PathStyle::Mod)?;
            if !self.eat(TokenKind::ColonColon) {
                let alias = if self.eat(TokenKind::As) {
                    Some(self.parse_ident()?)
                } else {
                    None
                };
                return Ok(UseTree {
                    kind: UseTreeKind::Path { path, alias },
                    span: start.to(self.prev_span()),
                });
            }
            Some(path)
        } else {
            self.eat(TokenKind::ColonColon);
            None
        };

        let kind = match self.peek() {
            TokenKind::Star => {
                self.advance();
                UseTreeKind::Glob { prefix }
            }
            TokenKind::LBrace => {
                let ((trees, _), _) = self.delimited(
                    TokenKind::LBrace,
                    TokenKind::RBrace,
                    "use group",
                    |p| p.comma_list(TokenKind::RBrace, Self::parse_use_tree),
                )?;
                UseTreeKind::Nested { prefix, trees }
            }
            _ => return Err(self.unexpected("`*`, `{` or a path in `use`")),
        };
        Ok(UseTree {
            kind,
            span: start.to(self.prev_span()),
        })
    }

    // ==================== TRAITS ====================

    fn parse_trait(&mut self) -> PResult<TraitDef> {
        self.expect(TokenKind::Trait)?;
        let name = self.parse_ident()?;
        let generics = self.parse_generics()?;
        let mut supertraits = Vec::new();
        if self.eat(TokenKind::Colon) {
            supertraits.push(self.parse_path(PathStyle::Type)?);
            while self.eat(TokenKind::Comma) {
                supertraits.push(self.parse_path(PathStyle::Type)?);
            }
        }
        let members = self.parse_members("trait body")?;
        Ok(TraitDef {
            name,
            generics,
            supertraits,
            members,
        })
    }

    /// `impl [<..>] Type [for Type]`
    fn parse_impl(&mut self) -> PResult<ImplDef> {
        self.expect(TokenKind::Impl)?;
        let generics = self.parse_generics()?;
        let first = self.parse_ty()?;
        let (trait_ref, self_ty) = if self.eat(TokenKind::For) {
            let self_ty = self.parse_ty()?;
            match first.kind {
                TyKind::Path(path) => (Some(path), self_ty),
                _ => {
                    return Err(self.misplaced(
                        first.span,
                        "expected a trait path before `for`",
                        None,
                    ));
                }
            }
        } else {
            (None, first)
        };
        let members = self.parse_members("impl body")?;
        Ok(ImplDef {
            generics,
            trait_ref,
            self_ty,
            members,
        })
    }
}
