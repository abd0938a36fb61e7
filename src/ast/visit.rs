//! Read-only AST traversal
//!
//! Override the `visit_*` methods of interest and call the matching `walk_*`
//! function to continue into children. Children are visited in source order.

use super::*;

pub trait Visitor: Sized {
    fn visit_file(&mut self, file: &File) {
        walk_file(self, file);
    }

    fn visit_item(&mut self, item: &Item) {
        walk_item(self, item);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_pat(&mut self, pat: &Pat) {
        walk_pat(self, pat);
    }

    fn visit_ty(&mut self, ty: &Ty) {
        walk_ty(self, ty);
    }

    fn visit_path(&mut self, path: &Path) {
        walk_path(self, path);
    }
}

pub fn walk_file<V: Visitor>(v: &mut V, file: &File) {
    for item in &file.items {
        v.visit_item(item);
    }
}

fn walk_generics<V: Visitor>(v: &mut V, generics: &Option<Generics>) {
    let Some(generics) = generics else { return };
    for param in &generics.params {
        match &param.kind {
            GenericParamKind::Type { bound, .. } => {
                if let Some(bound) = bound {
                    v.visit_ty(bound);
                }
            }
            GenericParamKind::Lifetime(_) => {}
            GenericParamKind::Const { ty, default, .. } => {
                v.visit_ty(ty);
                if let Some(default) = default {
                    v.visit_expr(default);
                }
            }
        }
    }
}

fn walk_fields<V: Visitor>(v: &mut V, fields: &[FieldDef]) {
    for field in fields {
        v.visit_ty(&field.ty);
    }
}

fn walk_use_tree<V: Visitor>(v: &mut V, tree: &UseTree) {
    match &tree.kind {
        UseTreeKind::Path { path, .. } => v.visit_path(path),
        UseTreeKind::Glob { prefix } => {
            if let Some(prefix) = prefix {
                v.visit_path(prefix);
            }
        }
        UseTreeKind::Nested { prefix, trees } => {
            if let Some(prefix) = prefix {
                v.visit_path(prefix);
            }
            for tree in trees {
                walk_use_tree(v, tree);
            }
        }
    }
}

pub fn walk_item<V: Visitor>(v: &mut V, item: &Item) {
    match &item.kind {
        ItemKind::Func(func) => {
            walk_generics(v, &func.generics);
            for param in &func.params {
                v.visit_pat(&param.pat);
                v.visit_ty(&param.ty);
                if let Some(default) = &param.default {
                    v.visit_expr(default);
                }
            }
            if let Some(ret) = &func.ret {
                v.visit_ty(ret);
            }
            match &func.body {
                FuncBody::Empty(_) => {}
                FuncBody::Block(block) => v.visit_block(block),
                FuncBody::Expr(expr) => v.visit_expr(expr),
            }
        }
        ItemKind::Struct(def) => {
            walk_generics(v, &def.generics);
            if let Some(fields) = &def.fields {
                walk_fields(v, fields);
            }
        }
        ItemKind::Enum(def) => {
            walk_generics(v, &def.generics);
            for variant in def.variants.iter().flatten() {
                match &variant.kind {
                    VariantKind::Unit => {}
                    VariantKind::Discriminant(expr) => v.visit_expr(expr),
                    VariantKind::Tuple(types) => {
                        for ty in types {
                            v.visit_ty(ty);
                        }
                    }
                    VariantKind::Struct(fields) => walk_fields(v, fields),
                }
            }
        }
        ItemKind::TypeAlias(def) => {
            walk_generics(v, &def.generics);
            v.visit_ty(&def.ty);
        }
        ItemKind::Mod(def) => {
            for item in def.items.iter().flatten() {
                v.visit_item(item);
            }
        }
        ItemKind::Use(tree) => walk_use_tree(v, tree),
        ItemKind::Trait(def) => {
            walk_generics(v, &def.generics);
            for path in &def.supertraits {
                v.visit_path(path);
            }
            for item in def.members.iter().flatten() {
                v.visit_item(item);
            }
        }
        ItemKind::Impl(def) => {
            walk_generics(v, &def.generics);
            if let Some(path) = &def.trait_ref {
                v.visit_path(path);
            }
            v.visit_ty(&def.self_ty);
            for item in def.members.iter().flatten() {
                v.visit_item(item);
            }
        }
        ItemKind::Const(def) => {
            v.visit_ty(&def.ty);
            if let Some(value) = &def.value {
                v.visit_expr(value);
            }
        }
        ItemKind::Error => {}
    }
}

pub fn walk_block<V: Visitor>(v: &mut V, block: &Block) {
    for stmt in &block.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visitor>(v: &mut V, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Let(local) => {
            v.visit_pat(&local.pat);
            if let Some(ty) = &local.ty {
                v.visit_ty(ty);
            }
            if let Some(init) = &local.init {
                v.visit_expr(init);
            }
        }
        StmtKind::Item(item) => v.visit_item(item),
        StmtKind::Expr { expr, .. } => v.visit_expr(expr),
        StmtKind::Empty | StmtKind::Error => {}
    }
}

fn walk_body<V: Visitor>(v: &mut V, body: &Body) {
    if let Body::Block(block) = body {
        v.visit_block(block);
    }
}

pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Lit(_) | ExprKind::Unit | ExprKind::Continue | ExprKind::Error => {}
        ExprKind::Path(path) => v.visit_path(path),
        ExprKind::Paren(inner) | ExprKind::Try(inner) => v.visit_expr(inner),
        ExprKind::Tuple(elems) | ExprKind::List(elems) => {
            for elem in elems {
                v.visit_expr(elem);
            }
        }
        ExprKind::Block(block) => v.visit_block(block),
        ExprKind::Lambda { params, body } => {
            for param in params {
                v.visit_pat(&param.pat);
                if let Some(ty) = &param.ty {
                    v.visit_ty(ty);
                }
            }
            v.visit_expr(body);
        }
        ExprKind::If {
            cond,
            body,
            otherwise,
        } => {
            v.visit_expr(cond);
            walk_body(v, body);
            match otherwise.as_deref() {
                Some(ElseBranch::Elif(elif)) => v.visit_expr(elif),
                Some(ElseBranch::Else(body)) => walk_body(v, body),
                None => {}
            }
        }
        ExprKind::Match { subject, arms, .. } => {
            v.visit_expr(subject);
            for arm in arms {
                for pat in &arm.pats {
                    v.visit_pat(pat);
                }
                v.visit_expr(&arm.body);
            }
        }
        ExprKind::Loop { body } => walk_body(v, body),
        ExprKind::While { cond, body } => {
            v.visit_expr(cond);
            walk_body(v, body);
        }
        ExprKind::WhileLet {
            pat,
            scrutinee,
            body,
        } => {
            v.visit_pat(pat);
            v.visit_expr(scrutinee);
            walk_body(v, body);
        }
        ExprKind::For { pat, iter, body } => {
            v.visit_pat(pat);
            v.visit_expr(iter);
            walk_body(v, body);
        }
        ExprKind::Return(value) | ExprKind::Break(value) => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        ExprKind::Binary { lhs, rhs, .. } | ExprKind::Assign { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        ExprKind::Unary { operand, .. } | ExprKind::Borrow { operand, .. } => {
            v.visit_expr(operand)
        }
        ExprKind::Cast { expr, ty } => {
            v.visit_expr(expr);
            v.visit_ty(ty);
        }
        ExprKind::Call { callee, args } => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(&arg.value);
            }
        }
        ExprKind::Index { base, indices } => {
            v.visit_expr(base);
            for index in indices {
                v.visit_expr(index);
            }
        }
        ExprKind::Field { base, .. } | ExprKind::TupleField { base, .. } => v.visit_expr(base),
    }
}

pub fn walk_pat<V: Visitor>(v: &mut V, pat: &Pat) {
    match &pat.kind {
        PatKind::Wildcard | PatKind::Rest | PatKind::Lit { .. } | PatKind::Unit | PatKind::Error => {}
        PatKind::Ident { sub, .. } => {
            if let Some(sub) = sub {
                v.visit_pat(sub);
            }
        }
        PatKind::Ref(inner) | PatKind::Mut(inner) | PatKind::Borrow(inner) | PatKind::Paren(inner) => {
            v.visit_pat(inner)
        }
        PatKind::Range { lo, hi, .. } => {
            v.visit_pat(lo);
            v.visit_pat(hi);
        }
        PatKind::Path(path) => v.visit_path(path),
        PatKind::Tuple(elems) | PatKind::Slice(elems) => {
            for elem in elems {
                v.visit_pat(elem);
            }
        }
        PatKind::TupleStruct { path, elems } => {
            v.visit_path(path);
            for elem in elems {
                v.visit_pat(elem);
            }
        }
        PatKind::Struct { path, fields, .. } => {
            v.visit_path(path);
            for field in fields {
                v.visit_pat(&field.pat);
            }
        }
    }
}

pub fn walk_ty<V: Visitor>(v: &mut V, ty: &Ty) {
    match &ty.kind {
        TyKind::Prim(_) | TyKind::Never | TyKind::Unit | TyKind::Error => {}
        TyKind::Paren(inner) | TyKind::Slice(inner) | TyKind::Ref(inner) | TyKind::Mut(inner) => {
            v.visit_ty(inner)
        }
        TyKind::Tuple(elems) => {
            for elem in elems {
                v.visit_ty(elem);
            }
        }
        TyKind::Func { params, ret } => {
            for param in params {
                v.visit_ty(param);
            }
            v.visit_ty(ret);
        }
        TyKind::Array { elem, len } => {
            v.visit_ty(elem);
            v.visit_expr(len);
        }
        TyKind::Path(path) => v.visit_path(path),
    }
}

pub fn walk_path<V: Visitor>(v: &mut V, path: &Path) {
    for segment in &path.segments {
        let Some(generics) = &segment.generics else {
            continue;
        };
        for arg in &generics.args {
            match arg {
                GenericArg::Type(ty) | GenericArg::Binding { ty, .. } => v.visit_ty(ty),
                GenericArg::Lifetime(_) => {}
                GenericArg::Const(expr) => v.visit_expr(expr),
            }
        }
    }
}
