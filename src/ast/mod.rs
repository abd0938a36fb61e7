//! Abstract Syntax Tree for the Jacy language
//!
//! This module defines the syntax tree produced by the parser. Every node
//! carries the span of the source it was parsed from, and a parent's span
//! contains the spans of all its children. Nodes that failed to parse are
//! replaced by `Error` variants spanning the skipped input.

pub mod visit;

use crate::common::{NodeId, Span, Symbol};
use serde::{Deserialize, Serialize};

/// A parsed source file
#[derive(Debug, Clone)]
pub struct File {
    pub items: Vec<Item>,
    pub span: Span,
}

/// Identifier with its location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident {
    pub name: Symbol,
    pub span: Span,
}

/// `'a`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifetime {
    pub name: Symbol,
    pub span: Span,
}

/// Item visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Private,
    Public(Span),
}

// ==================== ITEMS ====================

#[derive(Debug, Clone)]
pub struct Item {
    pub id: NodeId,
    pub vis: Visibility,
    pub kind: ItemKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ItemKind {
    Func(FuncDef),
    Struct(StructDef),
    Enum(EnumDef),
    TypeAlias(TypeAliasDef),
    Mod(ModDef),
    Use(UseTree),
    Trait(TraitDef),
    Impl(ImplDef),
    Const(ConstDef),
    Error,
}

impl ItemKind {
    pub fn name(&self) -> Option<Ident> {
        match self {
            ItemKind::Func(f) => Some(f.name),
            ItemKind::Struct(s) => Some(s.name),
            ItemKind::Enum(e) => Some(e.name),
            ItemKind::TypeAlias(t) => Some(t.name),
            ItemKind::Mod(m) => Some(m.name),
            ItemKind::Trait(t) => Some(t.name),
            ItemKind::Const(c) => Some(c.name),
            ItemKind::Use(_) | ItemKind::Impl(_) | ItemKind::Error => None,
        }
    }
}

/// Generic parameters `<T: Bound, 'a, const N: uint>`
#[derive(Debug, Clone)]
pub struct Generics {
    pub params: Vec<GenericParam>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct GenericParam {
    pub kind: GenericParamKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum GenericParamKind {
    Type { name: Ident, bound: Option<Ty> },
    Lifetime(Lifetime),
    Const { name: Ident, ty: Ty, default: Option<Expr> },
}

/// Function definition
#[derive(Debug, Clone)]
pub struct FuncDef {
    pub name: Ident,
    pub generics: Option<Generics>,
    pub params: Vec<Param>,
    pub ret: Option<Ty>,
    pub body: FuncBody,
}

/// Function parameter `pat: Type [= default]`
#[derive(Debug, Clone)]
pub struct Param {
    pub id: NodeId,
    pub pat: Pat,
    pub ty: Ty,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum FuncBody {
    /// `;`
    Empty(Span),
    Block(Block),
    /// `= expr;`
    Expr(Box<Expr>),
}

impl FuncBody {
    pub fn span(&self) -> Span {
        match self {
            FuncBody::Empty(span) => *span,
            FuncBody::Block(block) => block.span,
            FuncBody::Expr(expr) => expr.span,
        }
    }
}

/// Struct definition; `fields` is `None` for `struct S;`
#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: Ident,
    pub generics: Option<Generics>,
    pub fields: Option<Vec<FieldDef>>,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub id: NodeId,
    pub vis: Visibility,
    pub name: Ident,
    pub ty: Ty,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: Ident,
    pub generics: Option<Generics>,
    pub variants: Option<Vec<Variant>>,
}

#[derive(Debug, Clone)]
pub struct Variant {
    pub id: NodeId,
    pub name: Ident,
    pub kind: VariantKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum VariantKind {
    Unit,
    Discriminant(Expr),
    Tuple(Vec<Ty>),
    Struct(Vec<FieldDef>),
}

#[derive(Debug, Clone)]
pub struct TypeAliasDef {
    pub name: Ident,
    pub generics: Option<Generics>,
    pub ty: Ty,
}

/// `items` is `None` for `mod m;`
#[derive(Debug, Clone)]
pub struct ModDef {
    pub name: Ident,
    pub items: Option<Vec<Item>>,
}

/// `use` tree
#[derive(Debug, Clone)]
pub struct UseTree {
    pub kind: UseTreeKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum UseTreeKind {
    /// `a::b` or `a::b as c`
    Path { path: Path, alias: Option<Ident> },
    /// `a::*`
    Glob { prefix: Option<Path> },
    /// `a::{b, c}`
    Nested { prefix: Option<Path>, trees: Vec<UseTree> },
}

#[derive(Debug, Clone)]
pub struct TraitDef {
    pub name: Ident,
    pub generics: Option<Generics>,
    pub supertraits: Vec<Path>,
    pub members: Option<Vec<Item>>,
}

#[derive(Debug, Clone)]
pub struct ImplDef {
    pub generics: Option<Generics>,
    pub trait_ref: Option<Path>,
    pub self_ty: Ty,
    pub members: Option<Vec<Item>>,
}

#[derive(Debug, Clone)]
pub struct ConstDef {
    pub name: Ident,
    pub ty: Ty,
    pub value: Option<Expr>,
}

// ==================== STATEMENTS ====================

#[derive(Debug, Clone)]
pub struct Block {
    pub id: NodeId,
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    /// Trailing expression without a terminator, the value of the block
    pub fn value(&self) -> Option<&Expr> {
        match self.stmts.last().map(|s| &s.kind) {
            Some(StmtKind::Expr {
                expr,
                terminated: false,
            }) => Some(expr),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: NodeId,
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Let(Box<Local>),
    Item(Box<Item>),
    /// `terminated` is false for block-like expressions and the trailing value
    Expr { expr: Expr, terminated: bool },
    /// `;`
    Empty,
    Error,
}

/// `let pat [: ty] [= init];`
#[derive(Debug, Clone)]
pub struct Local {
    pub pat: Pat,
    pub ty: Option<Ty>,
    pub init: Option<Expr>,
}

// ==================== EXPRESSIONS ====================

#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Lit(Lit),
    Path(Path),
    /// `(e)`
    Paren(Box<Expr>),
    /// `()`
    Unit,
    /// `(a,)`, `(a, b)`
    Tuple(Vec<Expr>),
    /// `[a, b]`
    List(Vec<Expr>),
    Block(Block),
    Lambda {
        params: Vec<LambdaParam>,
        body: Box<Expr>,
    },
    If {
        cond: Box<Expr>,
        body: Body,
        otherwise: Option<Box<ElseBranch>>,
    },
    /// `elided` is set for `match x;`
    Match {
        subject: Box<Expr>,
        arms: Vec<MatchArm>,
        elided: bool,
    },
    Loop {
        body: Body,
    },
    While {
        cond: Box<Expr>,
        body: Body,
    },
    WhileLet {
        pat: Box<Pat>,
        scrutinee: Box<Expr>,
        body: Body,
    },
    For {
        pat: Box<Pat>,
        iter: Box<Expr>,
        body: Body,
    },
    Return(Option<Box<Expr>>),
    Break(Option<Box<Expr>>),
    Continue,
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `&e`, `&mut e`
    Borrow {
        mutable: bool,
        operand: Box<Expr>,
    },
    Cast {
        expr: Box<Expr>,
        ty: Box<Ty>,
    },
    /// `e?`
    Try(Box<Expr>),
    Call {
        callee: Box<Expr>,
        args: Vec<Arg>,
    },
    Index {
        base: Box<Expr>,
        indices: Vec<Expr>,
    },
    Field {
        base: Box<Expr>,
        field: Ident,
    },
    /// `t.0`
    TupleField {
        base: Box<Expr>,
        index: u32,
        index_span: Span,
    },
    Error,
}

impl ExprKind {
    /// Expressions that end in a block and need no `;` as statements
    pub fn is_block_like(&self) -> bool {
        matches!(
            self,
            ExprKind::Block(_)
                | ExprKind::If { .. }
                | ExprKind::Match { .. }
                | ExprKind::Loop { .. }
                | ExprKind::While { .. }
                | ExprKind::WhileLet { .. }
                | ExprKind::For { .. }
        )
    }
}

/// Either-semicolon body: `;` or a block
#[derive(Debug, Clone)]
pub enum Body {
    Empty(Span),
    Block(Block),
}

impl Body {
    pub fn span(&self) -> Span {
        match self {
            Body::Empty(span) => *span,
            Body::Block(block) => block.span,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty(_))
    }
}

#[derive(Debug, Clone)]
pub enum ElseBranch {
    /// `elif cond body ...`, always an `ExprKind::If`
    Elif(Expr),
    Else(Body),
}

#[derive(Debug, Clone)]
pub struct MatchArm {
    pub id: NodeId,
    /// Alternatives separated by `|`
    pub pats: Vec<Pat>,
    pub body: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct LambdaParam {
    pub pat: Pat,
    pub ty: Option<Ty>,
    pub span: Span,
}

/// Call argument, optionally named: `f(x: 1)`
#[derive(Debug, Clone)]
pub struct Arg {
    pub name: Option<Ident>,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lit {
    pub kind: LitKind,
    pub symbol: Symbol,
    pub suffix: Option<Symbol>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LitKind {
    Bool,
    Int(IntBase),
    Float,
    Char,
    Str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntBase {
    Dec,
    Hex,
    Bin,
    Oct,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Cmp,
    // Logical
    And,
    Or,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    // Other
    Pipe,
    Range,
    RangeInclusive,
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
    /// `~`
    Inv,
    Deref,
}

// ==================== PATTERNS ====================

#[derive(Debug, Clone)]
pub struct Pat {
    pub id: NodeId,
    pub kind: PatKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum PatKind {
    /// `_`
    Wildcard,
    /// `..` inside tuple and slice patterns
    Rest,
    Lit {
        lit: Lit,
        negated: bool,
    },
    /// `x` or `x @ sub`
    Ident {
        name: Ident,
        sub: Option<Box<Pat>>,
    },
    /// `ref p`
    Ref(Box<Pat>),
    /// `mut p`
    Mut(Box<Pat>),
    /// `&p`
    Borrow(Box<Pat>),
    Range {
        lo: Box<Pat>,
        hi: Box<Pat>,
        inclusive: bool,
    },
    Path(Path),
    Unit,
    Paren(Box<Pat>),
    Tuple(Vec<Pat>),
    TupleStruct {
        path: Path,
        elems: Vec<Pat>,
    },
    Struct {
        path: Path,
        fields: Vec<FieldPat>,
        rest: bool,
    },
    Slice(Vec<Pat>),
    Error,
}

/// `name: pat` or shorthand `name`
#[derive(Debug, Clone)]
pub struct FieldPat {
    pub name: Ident,
    pub pat: Pat,
    pub shorthand: bool,
    pub span: Span,
}

// ==================== TYPES ====================

#[derive(Debug, Clone)]
pub struct Ty {
    pub id: NodeId,
    pub kind: TyKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TyKind {
    Prim(PrimTy),
    /// `!`
    Never,
    /// `()`
    Unit,
    Paren(Box<Ty>),
    Tuple(Vec<Ty>),
    /// `(A, B) -> R`
    Func {
        params: Vec<Ty>,
        ret: Box<Ty>,
    },
    /// `[T]`
    Slice(Box<Ty>),
    /// `[T; N]`
    Array {
        elem: Box<Ty>,
        len: Box<Expr>,
    },
    /// `&T`
    Ref(Box<Ty>),
    /// `mut T`
    Mut(Box<Ty>),
    Path(Path),
    Error,
}

/// Primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimTy {
    Bool,
    Int(IntTy),
    Uint(UintTy),
    Float(FloatTy),
    Char,
    Str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntTy {
    I8,
    I16,
    I32,
    I64,
    I128,
    /// Pointer-sized `int`
    Int,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UintTy {
    U8,
    U16,
    U32,
    U64,
    U128,
    /// Pointer-sized `uint`
    Uint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatTy {
    F32,
    F64,
}

// ==================== PATHS ====================

/// `[::]seg::seg<..>::seg`
#[derive(Debug, Clone)]
pub struct Path {
    pub id: NodeId,
    pub global: bool,
    pub segments: Vec<PathSegment>,
    pub span: Span,
}

impl Path {
    /// The identifier of a single-segment, argument-free path
    pub fn as_ident(&self) -> Option<Ident> {
        match self.segments.as_slice() {
            [seg] if !self.global && seg.generics.is_none() => match seg.kind {
                PathSegmentKind::Ident(ident) => Some(ident),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathSegment {
    pub kind: PathSegmentKind,
    pub generics: Option<GenericArgs>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegmentKind {
    Ident(Ident),
    SelfValue(Span),
    Super(Span),
    Party(Span),
}

/// `<T, 'a, 3, Item = U>`
#[derive(Debug, Clone)]
pub struct GenericArgs {
    pub args: Vec<GenericArg>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum GenericArg {
    Type(Ty),
    Lifetime(Lifetime),
    Const(Expr),
    Binding { name: Ident, ty: Ty, span: Span },
}

impl GenericArg {
    pub fn span(&self) -> Span {
        match self {
            GenericArg::Type(ty) => ty.span,
            GenericArg::Lifetime(lt) => lt.span,
            GenericArg::Const(expr) => expr.span,
            GenericArg::Binding { span, .. } => *span,
        }
    }
}
