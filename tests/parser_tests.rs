//! Parser tests

use jacy_syntax::ast::*;
use jacy_syntax::diagnostics::ErrorKind;
use jacy_syntax::{parse_expr, parse_file, parse_file_with, parse_pattern, parse_type, ParseConfig, Parsed};
use pretty_assertions::assert_eq;

fn parse_source(source: &str) -> Parsed<File> {
    let parsed = parse_file(source);
    assert!(
        parsed.diagnostics.is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        parsed.diagnostics.as_slice()
    );
    parsed
}

fn expr(source: &str) -> Parsed<Expr> {
    let parsed = parse_expr(source);
    assert!(
        parsed.diagnostics.is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        parsed.diagnostics.as_slice()
    );
    parsed
}

fn func_body(file: &File) -> &Block {
    let ItemKind::Func(f) = &file.items[0].kind else {
        panic!("Expected function");
    };
    let FuncBody::Block(block) = &f.body else {
        panic!("Expected block body");
    };
    block
}

fn ident_name(parsed: &Parsed<impl Sized>, expr: &Expr) -> String {
    let ExprKind::Path(path) = &expr.kind else {
        panic!("Expected path, got {:?}", expr.kind);
    };
    let ident = path.as_ident().expect("single segment path");
    parsed.resolve(ident.name).to_string()
}

// ==================== ITEMS ====================

#[test]
fn test_parse_empty_file() {
    let parsed = parse_source("");
    assert!(parsed.node.items.is_empty());
}

#[test]
fn test_parse_simple_function() {
    let parsed = parse_source("func main() { }");
    assert_eq!(parsed.node.items.len(), 1);

    if let ItemKind::Func(f) = &parsed.node.items[0].kind {
        assert_eq!(parsed.resolve(f.name.name), "main");
        assert!(f.params.is_empty());
        assert!(f.ret.is_none());
    } else {
        panic!("Expected function");
    }
}

#[test]
fn test_parse_function_with_params() {
    let parsed = parse_source("func add(a: int, b: int = 1): int { a + b }");

    if let ItemKind::Func(f) = &parsed.node.items[0].kind {
        assert_eq!(f.params.len(), 2);
        assert!(f.params[0].default.is_none());
        assert!(f.params[1].default.is_some());
        assert!(matches!(
            f.ret.as_ref().map(|t| &t.kind),
            Some(TyKind::Prim(PrimTy::Int(IntTy::Int)))
        ));
    } else {
        panic!("Expected function");
    }
}

#[test]
fn test_parse_function_bodies() {
    let parsed = parse_source("func a(); func b(): int = 1; func c() {}");
    let bodies: Vec<_> = parsed
        .node
        .items
        .iter()
        .map(|item| match &item.kind {
            ItemKind::Func(f) => match f.body {
                FuncBody::Empty(_) => "empty",
                FuncBody::Expr(_) => "expr",
                FuncBody::Block(_) => "block",
            },
            _ => panic!("Expected function"),
        })
        .collect();
    assert_eq!(bodies, vec!["empty", "expr", "block"]);
}

#[test]
fn test_arrow_return_type_is_reported_and_accepted() {
    let parsed = parse_file("func f() -> int { 1 }");
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics.as_slice()[0].kind(), ErrorKind::Misplaced);
    let ItemKind::Func(f) = &parsed.node.items[0].kind else {
        panic!("Expected function");
    };
    assert!(f.ret.is_some());
}

#[test]
fn test_parse_generic_function() {
    let parsed = parse_source("func id<T: Clone, 'a, const N: uint = 3>(x: T): T { x }");
    let ItemKind::Func(f) = &parsed.node.items[0].kind else {
        panic!("Expected function");
    };
    let params = &f.generics.as_ref().expect("generics").params;
    assert_eq!(params.len(), 3);
    assert!(matches!(&params[0].kind, GenericParamKind::Type { bound: Some(_), .. }));
    assert!(matches!(params[1].kind, GenericParamKind::Lifetime(_)));
    assert!(matches!(&params[2].kind, GenericParamKind::Const { default: Some(_), .. }));
}

#[test]
fn test_parse_struct_and_enum() {
    let parsed = parse_source(
        "pub struct Point { pub x: f64, y: f64 }
         struct Unit;
         enum Shape { Empty, Code = 3, Circle(f64), Rect { w: f64, h: f64 } }",
    );
    let items = &parsed.node.items;
    assert!(matches!(items[0].vis, Visibility::Public(_)));
    let ItemKind::Struct(point) = &items[0].kind else {
        panic!("Expected struct");
    };
    let fields = point.fields.as_ref().expect("fields");
    assert_eq!(fields.len(), 2);
    assert!(matches!(fields[0].vis, Visibility::Public(_)));
    assert!(matches!(fields[1].vis, Visibility::Private));

    let ItemKind::Struct(unit) = &items[1].kind else {
        panic!("Expected struct");
    };
    assert!(unit.fields.is_none());

    let ItemKind::Enum(shape) = &items[2].kind else {
        panic!("Expected enum");
    };
    let variants = shape.variants.as_ref().expect("variants");
    assert!(matches!(variants[0].kind, VariantKind::Unit));
    assert!(matches!(variants[1].kind, VariantKind::Discriminant(_)));
    assert!(matches!(&variants[2].kind, VariantKind::Tuple(t) if t.len() == 1));
    assert!(matches!(&variants[3].kind, VariantKind::Struct(f) if f.len() == 2));
}

#[test]
fn test_parse_use_trees() {
    let parsed = parse_source("use a::b; use a::b as c; use a::*; use a::{b, c::d, e::*};");
    let kinds: Vec<_> = parsed
        .node
        .items
        .iter()
        .map(|item| match &item.kind {
            ItemKind::Use(tree) => match &tree.kind {
                UseTreeKind::Path { alias: None, .. } => "path",
                UseTreeKind::Path { alias: Some(_), .. } => "alias",
                UseTreeKind::Glob { .. } => "glob",
                UseTreeKind::Nested { trees, .. } => {
                    assert_eq!(trees.len(), 3);
                    "nested"
                }
            },
            _ => panic!("Expected use"),
        })
        .collect();
    assert_eq!(kinds, vec!["path", "alias", "glob", "nested"]);
}

#[test]
fn test_parse_mod_trait_impl() {
    let parsed = parse_source(
        "mod shapes { func area(): f64; }
         mod external;
         trait Show: Debug, Clone { func show(self_: Self): str; }
         impl<T> Show for Wrapper<T> { func show(self_: Self): str = \"w\"; }
         impl Point {}",
    );
    let items = &parsed.node.items;
    let ItemKind::Mod(m) = &items[0].kind else {
        panic!("Expected module");
    };
    assert_eq!(m.items.as_ref().map(Vec::len), Some(1));
    let ItemKind::Mod(external) = &items[1].kind else {
        panic!("Expected module");
    };
    assert!(external.items.is_none());
    let ItemKind::Trait(t) = &items[2].kind else {
        panic!("Expected trait");
    };
    assert_eq!(t.supertraits.len(), 2);
    let ItemKind::Impl(imp) = &items[3].kind else {
        panic!("Expected impl");
    };
    assert!(imp.trait_ref.is_some());
    assert!(imp.generics.is_some());
    let TyKind::Path(self_ty) = &imp.self_ty.kind else {
        panic!("Expected path type");
    };
    assert!(self_ty.segments[0].generics.is_some());
    let ItemKind::Impl(inherent) = &items[4].kind else {
        panic!("Expected impl");
    };
    assert!(inherent.trait_ref.is_none());
}

#[test]
fn test_parse_const_and_type_alias() {
    let parsed = parse_source("const MAX: uint = 10; type Grid = [[u8; 3]; 3];");
    assert!(matches!(parsed.node.items[0].kind, ItemKind::Const(_)));
    let ItemKind::TypeAlias(alias) = &parsed.node.items[1].kind else {
        panic!("Expected type alias");
    };
    let TyKind::Array { elem, .. } = &alias.ty.kind else {
        panic!("Expected array");
    };
    assert!(matches!(elem.kind, TyKind::Array { .. }));
}

#[test]
fn test_expression_at_item_level_is_misplaced() {
    let parsed = parse_file("1 + 2; func f() {}");
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics.as_slice()[0].kind(), ErrorKind::Misplaced);
    assert!(matches!(parsed.node.items[0].kind, ItemKind::Error));
    assert!(matches!(parsed.node.items[1].kind, ItemKind::Func(_)));
}

// ==================== STATEMENTS ====================

#[test]
fn test_block_value() {
    let parsed = parse_source("func f() { let x = 1; x }");
    let block = func_body(&parsed.node);
    assert_eq!(block.stmts.len(), 2);
    assert!(matches!(block.stmts[0].kind, StmtKind::Let(_)));
    let value = block.value().expect("block value");
    assert_eq!(ident_name(&parsed, value), "x");
}

#[test]
fn test_terminated_block_has_no_value() {
    let parsed = parse_source("func f() { g(); }");
    assert!(func_body(&parsed.node).value().is_none());
}

#[test]
fn test_let_forms() {
    let parsed = parse_source("func f() { let a; let b: int; let c = 1; let (d, e): (int, int) = (1, 2); }");
    let block = func_body(&parsed.node);
    let locals: Vec<(bool, bool)> = block
        .stmts
        .iter()
        .map(|stmt| match &stmt.kind {
            StmtKind::Let(local) => (local.ty.is_some(), local.init.is_some()),
            _ => panic!("Expected let"),
        })
        .collect();
    assert_eq!(locals, vec![(false, false), (true, false), (false, true), (true, true)]);
}

#[test]
fn test_block_like_statements_need_no_semicolon() {
    let parsed = parse_source(
        "func f() {
            if a { b(); }
            while c { }
            for x in xs { }
            loop { break; }
            match y { _ => 1 }
            { inner(); }
            done()
        }",
    );
    let block = func_body(&parsed.node);
    assert_eq!(block.stmts.len(), 7);
    assert!(block.value().is_some());
}

#[test]
fn test_nested_item_statement() {
    let parsed = parse_source("func f() { func g() {} struct S; g() }");
    let block = func_body(&parsed.node);
    assert!(matches!(block.stmts[0].kind, StmtKind::Item(_)));
    assert!(matches!(block.stmts[1].kind, StmtKind::Item(_)));
}

#[test]
fn test_empty_statement() {
    let parsed = parse_source("func f() { ; }");
    assert!(matches!(func_body(&parsed.node).stmts[0].kind, StmtKind::Empty));
}

#[test]
fn test_elided_semicolons() {
    let config = ParseConfig {
        elide_semicolons: true,
        ..ParseConfig::default()
    };
    let parsed = parse_file_with("func f() {\n let a = 1\n a = a + 2\n g(a)\n}\nuse x::y\n", &config);
    assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics.as_slice());
    let block = func_body(&parsed.node);
    assert_eq!(block.stmts.len(), 3);
    assert!(block.value().is_some());
    assert_eq!(parsed.node.items.len(), 2);

    let parsed = parse_file_with(
        "func f() {\n let m: Map<K, V>\n foo()\n let v: Vec<T>\n (a, b)\n}\n",
        &config,
    );
    assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics.as_slice());
    let kinds: Vec<_> = func_body(&parsed.node)
        .stmts
        .iter()
        .map(|s| match &s.kind {
            StmtKind::Let(_) => "let",
            StmtKind::Expr { .. } => "expr",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["let", "expr", "let", "expr"]);
}

#[test]
fn test_missing_semicolon_without_elision() {
    let parsed = parse_file("func f() {\n let a = 1\n let b = 2;\n}");
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics.as_slice()[0].kind(), ErrorKind::UnexpectedToken);
}

// ==================== EXPRESSIONS ====================

#[test]
fn test_either_semicolon_if() {
    let parsed = parse_source("func f() { if cond; else { g(); } }");
    let StmtKind::Expr { expr, .. } = &func_body(&parsed.node).stmts[0].kind else {
        panic!("Expected expression statement");
    };
    let ExprKind::If { body, otherwise, .. } = &expr.kind else {
        panic!("Expected if");
    };
    assert!(body.is_empty());
    assert!(matches!(otherwise.as_deref(), Some(ElseBranch::Else(Body::Block(_)))));
}

#[test]
fn test_if_rejects_bare_expression_body() {
    let parsed = parse_file("func f() { if cond g(); }");
    assert!(parsed.has_errors());
}

#[test]
fn test_elif_chain() {
    let parsed = expr("if a { 1 } elif b { 2 } else { 3 }");
    let ExprKind::If { otherwise, .. } = &parsed.node.kind else {
        panic!("Expected if");
    };
    let Some(ElseBranch::Elif(elif)) = otherwise.as_deref() else {
        panic!("Expected elif");
    };
    assert!(matches!(
        &elif.kind,
        ExprKind::If { otherwise: Some(_), .. }
    ));
}

#[test]
fn test_match_arms() {
    let parsed = expr("match x { | 1 | 2 => a, Some(y) => { y } None => b, }");
    let ExprKind::Match { arms, elided, .. } = &parsed.node.kind else {
        panic!("Expected match");
    };
    assert!(!elided);
    assert_eq!(arms.len(), 3);
    assert_eq!(arms[0].pats.len(), 2);
}

#[test]
fn test_elided_match() {
    let parsed = expr("match x;");
    assert!(matches!(parsed.node.kind, ExprKind::Match { elided: true, .. }));
}

#[test]
fn test_while_let_and_for() {
    let parsed = parse_source("func f() { while let Some(x) = it.next() { } for (k, v) in map { } }");
    let block = func_body(&parsed.node);
    let kinds: Vec<_> = block
        .stmts
        .iter()
        .map(|s| match &s.kind {
            StmtKind::Expr { expr, .. } => match expr.kind {
                ExprKind::WhileLet { .. } => "while let",
                ExprKind::For { .. } => "for",
                _ => "other",
            },
            _ => "stmt",
        })
        .collect();
    assert_eq!(kinds, vec!["while let", "for"]);
}

#[test]
fn test_jumps() {
    let parsed = parse_source("func f() { loop { break; } loop { break 1; } return x; }");
    let block = func_body(&parsed.node);
    let StmtKind::Expr { expr, .. } = &block.stmts[2].kind else {
        panic!("Expected return");
    };
    assert!(matches!(expr.kind, ExprKind::Return(Some(_))));
}

#[test]
fn test_paren_unit_and_tuple() {
    assert!(matches!(expr("()").node.kind, ExprKind::Unit));
    assert!(matches!(expr("(a)").node.kind, ExprKind::Paren(_)));
    assert!(matches!(&expr("(a,)").node.kind, ExprKind::Tuple(e) if e.len() == 1));
    assert!(matches!(&expr("(a, b)").node.kind, ExprKind::Tuple(e) if e.len() == 2));
}

#[test]
fn test_lambdas() {
    let single = expr("x -> x + 1");
    assert!(matches!(&single.node.kind, ExprKind::Lambda { params, .. } if params.len() == 1));

    let multi = expr("(a, b: int) -> a * b");
    let ExprKind::Lambda { params, body } = &multi.node.kind else {
        panic!("Expected lambda");
    };
    assert_eq!(params.len(), 2);
    assert!(params[0].ty.is_none());
    assert!(params[1].ty.is_some());
    assert!(matches!(body.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));

    assert!(matches!(&expr("() -> 0").node.kind, ExprKind::Lambda { params, .. } if params.is_empty()));
}

#[test]
fn test_calls_and_postfix_chain() {
    let parsed = expr("a.b(c, name: d)[0].1?");
    let ExprKind::Try(inner) = &parsed.node.kind else {
        panic!("Expected try");
    };
    let ExprKind::TupleField { base, index, .. } = &inner.kind else {
        panic!("Expected tuple field");
    };
    assert_eq!(*index, 1);
    let ExprKind::Index { base, .. } = &base.kind else {
        panic!("Expected index");
    };
    let ExprKind::Call { args, callee } = &base.kind else {
        panic!("Expected call");
    };
    assert_eq!(args.len(), 2);
    assert!(args[0].name.is_none());
    assert_eq!(parsed.resolve(args[1].name.expect("named").name), "name");
    assert!(matches!(callee.kind, ExprKind::Field { .. }));
}

#[test]
fn test_prefix_operators() {
    let parsed = expr("-not ~*&mut x");
    let ExprKind::Unary { op: UnaryOp::Neg, operand } = &parsed.node.kind else {
        panic!("Expected negation");
    };
    let ExprKind::Unary { op: UnaryOp::Not, operand } = &operand.kind else {
        panic!("Expected not");
    };
    let ExprKind::Unary { op: UnaryOp::Inv, operand } = &operand.kind else {
        panic!("Expected inversion");
    };
    let ExprKind::Unary { op: UnaryOp::Deref, operand } = &operand.kind else {
        panic!("Expected deref");
    };
    assert!(matches!(operand.kind, ExprKind::Borrow { mutable: true, .. }));
}

#[test]
fn test_list_and_literals() {
    let parsed = expr("[1, 2.5, 'c', \"s\", true, 0xff]");
    let ExprKind::List(elems) = &parsed.node.kind else {
        panic!("Expected list");
    };
    let kinds: Vec<_> = elems
        .iter()
        .map(|e| match &e.kind {
            ExprKind::Lit(lit) => lit.kind,
            _ => panic!("Expected literal"),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            LitKind::Int(IntBase::Dec),
            LitKind::Float,
            LitKind::Char,
            LitKind::Str,
            LitKind::Bool,
            LitKind::Int(IntBase::Hex),
        ]
    );
}

#[test]
fn test_comparison_after_path_in_expression() {
    let parsed = expr("a < b");
    assert!(matches!(parsed.node.kind, ExprKind::Binary { op: BinaryOp::Lt, .. }));
}

#[test]
fn test_turbofish() {
    let parsed = expr("parse::<int>(s)");
    let ExprKind::Call { callee, .. } = &parsed.node.kind else {
        panic!("Expected call");
    };
    let ExprKind::Path(path) = &callee.kind else {
        panic!("Expected path");
    };
    let generics = path.segments[0].generics.as_ref().expect("turbofish");
    assert!(matches!(
        generics.args[0],
        GenericArg::Type(Ty { kind: TyKind::Prim(_), .. })
    ));
}

#[test]
fn test_cast_to_generic_type() {
    let parsed = expr("x as Vec<int>");
    let ExprKind::Cast { ty, .. } = &parsed.node.kind else {
        panic!("Expected cast");
    };
    let TyKind::Path(path) = &ty.kind else {
        panic!("Expected path type");
    };
    assert!(path.segments[0].generics.is_some());
}

#[test]
fn test_cast_followed_by_comparison() {
    let parsed = expr("x as T < y");
    let ExprKind::Binary { op: BinaryOp::Lt, lhs, .. } = &parsed.node.kind else {
        panic!("Expected comparison, got {:?}", parsed.node.kind);
    };
    assert!(matches!(lhs.kind, ExprKind::Cast { .. }));
}

// ==================== TYPES ====================

#[test]
fn test_nested_generic_types() {
    let parsed = parse_type("Map<str, Vec<Vec<int>>>");
    assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics.as_slice());
    let TyKind::Path(path) = &parsed.node.kind else {
        panic!("Expected path type");
    };
    let args = &path.segments[0].generics.as_ref().expect("args").args;
    assert_eq!(args.len(), 2);
}

#[test]
fn test_type_forms() {
    let cases = [
        ("()", "unit"),
        ("(int)", "paren"),
        ("(int,)", "tuple"),
        ("(int, bool) -> str", "func"),
        ("[u8]", "slice"),
        ("[u8; 4]", "array"),
        ("&mut T", "ref"),
        ("!", "never"),
        ("a::B<'a, 3, Item = T>", "path"),
    ];
    for (source, expected) in cases {
        let parsed = parse_type(source);
        assert!(parsed.diagnostics.is_empty(), "{source}: {:?}", parsed.diagnostics.as_slice());
        let kind = match parsed.node.kind {
            TyKind::Unit => "unit",
            TyKind::Paren(_) => "paren",
            TyKind::Tuple(_) => "tuple",
            TyKind::Func { .. } => "func",
            TyKind::Slice(_) => "slice",
            TyKind::Array { .. } => "array",
            TyKind::Ref(ref inner) => {
                assert!(matches!(inner.kind, TyKind::Mut(_)));
                "ref"
            }
            TyKind::Never => "never",
            TyKind::Path(_) => "path",
            _ => "other",
        };
        assert_eq!(kind, expected, "{source}");
    }
}

#[test]
fn test_generic_list_followed_by_comparison_operand_is_ambiguous() {
    let parsed = parse_file("func f() { let x: Vec<T> -1 = 2; g(); }");
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(
        parsed.diagnostics.as_slice()[0].kind(),
        ErrorKind::AmbiguousConstruct
    );
    let stmts = &func_body(&parsed.node).stmts;
    assert!(matches!(stmts[0].kind, StmtKind::Error));
    assert!(matches!(stmts[1].kind, StmtKind::Expr { .. }));
}

// ==================== PATTERNS ====================

#[test]
fn test_pattern_forms() {
    let cases = [
        ("_", "wildcard"),
        ("x", "ident"),
        ("x @ 1..=5", "ident"),
        ("ref mut x", "ref"),
        ("&x", "borrow"),
        ("-1", "lit"),
        ("'a'..='z'", "range"),
        ("a::B", "path"),
        ("Some(x)", "tuple struct"),
        ("Point { x, y: 0, .. }", "struct"),
        ("[first, .., last]", "slice"),
        ("(a, b)", "tuple"),
        ("(a)", "paren"),
        ("()", "unit"),
    ];
    for (source, expected) in cases {
        let parsed = parse_pattern(source);
        assert!(parsed.diagnostics.is_empty(), "{source}: {:?}", parsed.diagnostics.as_slice());
        let kind = match &parsed.node.kind {
            PatKind::Wildcard => "wildcard",
            PatKind::Ident { .. } => "ident",
            PatKind::Ref(inner) => {
                assert!(matches!(inner.kind, PatKind::Mut(_)));
                "ref"
            }
            PatKind::Borrow(_) => "borrow",
            PatKind::Lit { negated: true, .. } => "lit",
            PatKind::Range { inclusive: true, .. } => "range",
            PatKind::Path(_) => "path",
            PatKind::TupleStruct { .. } => "tuple struct",
            PatKind::Struct { fields, rest: true, .. } => {
                assert!(fields[0].shorthand);
                assert!(!fields[1].shorthand);
                "struct"
            }
            PatKind::Slice(elems) => {
                assert!(matches!(elems[1].kind, PatKind::Rest));
                "slice"
            }
            PatKind::Tuple(_) => "tuple",
            PatKind::Paren(_) => "paren",
            PatKind::Unit => "unit",
            _ => "other",
        };
        assert_eq!(kind, expected, "{source}");
    }
}

#[test]
fn test_identifier_pattern_is_a_binding_not_a_path() {
    let parsed = parse_pattern("None");
    assert!(matches!(parsed.node.kind, PatKind::Ident { sub: None, .. }));
}

#[test]
fn test_fragment_with_trailing_input_is_an_error() {
    let parsed = parse_expr("a b");
    assert!(parsed.has_errors());
    assert!(matches!(parsed.node.kind, ExprKind::Error));
}
