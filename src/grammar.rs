//! Static grammar tables
//!
//! The operator precedence ladder, keyword sets, primitive type names and the
//! ambiguity table live here as immutable data. The parser only consults them;
//! reordering a tier or moving an operator is a change to this file alone.

use crate::ast::{AssignOp, BinaryOp, FloatTy, IntTy, PrimTy, UintTy, UnaryOp};
use crate::lexer::TokenKind as T;
use crate::lexer::{Token, TokenKind};

use self::InfixOp::{Assign as A, Binary as B};
use self::Interpretation as I;

// ==================== PRECEDENCE ====================

/// Operator tiers, loosest binding first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Prec {
    Assign,
    Pipe,
    Range,
    Or,
    And,
    Compare,
    BitOr,
    BitXor,
    BitAnd,
    Shift,
    Additive,
    Multiplicative,
    Power,
    Cast,
    Unary,
    Try,
    Call,
    Field,
    Path,
}

impl Prec {
    pub const LADDER: [Prec; 19] = [
        Prec::Assign,
        Prec::Pipe,
        Prec::Range,
        Prec::Or,
        Prec::And,
        Prec::Compare,
        Prec::BitOr,
        Prec::BitXor,
        Prec::BitAnd,
        Prec::Shift,
        Prec::Additive,
        Prec::Multiplicative,
        Prec::Power,
        Prec::Cast,
        Prec::Unary,
        Prec::Try,
        Prec::Call,
        Prec::Field,
        Prec::Path,
    ];

    pub const LOWEST: Prec = Prec::Assign;

    /// The next tier up the ladder
    pub fn tighter(self) -> Option<Prec> {
        Prec::LADDER.get(self as usize + 1).copied()
    }

    /// Tiers occupied by infix operators; the rest are prefix/postfix forms
    pub fn is_infix(self) -> bool {
        self <= Prec::Cast
    }
}

/// What an infix operator builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfixOp {
    Binary(BinaryOp),
    Assign(AssignOp),
    /// `as`, whose right operand is a type
    Cast,
}

/// An infix operator spelled by one or more adjacent tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorDef {
    pub spelling: &'static [TokenKind],
    pub op: InfixOp,
    pub prec: Prec,
}

const fn op(spelling: &'static [TokenKind], op: InfixOp, prec: Prec) -> OperatorDef {
    OperatorDef { spelling, op, prec }
}

/// Every infix operator, grouped by tier
pub static OPERATORS: &[OperatorDef] = &[
    // Assignment
    op(&[T::Eq], A(AssignOp::Assign), Prec::Assign),
    op(&[T::PlusEq], A(AssignOp::Add), Prec::Assign),
    op(&[T::MinusEq], A(AssignOp::Sub), Prec::Assign),
    op(&[T::StarEq], A(AssignOp::Mul), Prec::Assign),
    op(&[T::SlashEq], A(AssignOp::Div), Prec::Assign),
    op(&[T::PercentEq], A(AssignOp::Rem), Prec::Assign),
    op(&[T::StarStarEq], A(AssignOp::Pow), Prec::Assign),
    op(&[T::AmpEq], A(AssignOp::BitAnd), Prec::Assign),
    op(&[T::PipeEq], A(AssignOp::BitOr), Prec::Assign),
    op(&[T::CaretEq], A(AssignOp::BitXor), Prec::Assign),
    op(&[T::ShlEq], A(AssignOp::Shl), Prec::Assign),
    op(&[T::Gt, T::Gt, T::Eq], A(AssignOp::Shr), Prec::Assign),
    // Pipe
    op(&[T::PipeGt], B(BinaryOp::Pipe), Prec::Pipe),
    // Range
    op(&[T::DotDot], B(BinaryOp::Range), Prec::Range),
    op(&[T::DotDotEq], B(BinaryOp::RangeInclusive), Prec::Range),
    // Logical
    op(&[T::Or], B(BinaryOp::Or), Prec::Or),
    op(&[T::And], B(BinaryOp::And), Prec::And),
    // Comparison
    op(&[T::EqEq], B(BinaryOp::Eq), Prec::Compare),
    op(&[T::BangEq], B(BinaryOp::Ne), Prec::Compare),
    op(&[T::Lt], B(BinaryOp::Lt), Prec::Compare),
    op(&[T::Le], B(BinaryOp::Le), Prec::Compare),
    op(&[T::Gt], B(BinaryOp::Gt), Prec::Compare),
    op(&[T::Gt, T::Eq], B(BinaryOp::Ge), Prec::Compare),
    op(&[T::Spaceship], B(BinaryOp::Cmp), Prec::Compare),
    // Bitwise
    op(&[T::Pipe], B(BinaryOp::BitOr), Prec::BitOr),
    op(&[T::Caret], B(BinaryOp::BitXor), Prec::BitXor),
    op(&[T::Amp], B(BinaryOp::BitAnd), Prec::BitAnd),
    op(&[T::Shl], B(BinaryOp::Shl), Prec::Shift),
    op(&[T::Gt, T::Gt], B(BinaryOp::Shr), Prec::Shift),
    // Arithmetic
    op(&[T::Plus], B(BinaryOp::Add), Prec::Additive),
    op(&[T::Minus], B(BinaryOp::Sub), Prec::Additive),
    op(&[T::Star], B(BinaryOp::Mul), Prec::Multiplicative),
    op(&[T::Slash], B(BinaryOp::Div), Prec::Multiplicative),
    op(&[T::Percent], B(BinaryOp::Rem), Prec::Multiplicative),
    op(&[T::StarStar], B(BinaryOp::Pow), Prec::Power),
    // Cast
    op(&[T::As], InfixOp::Cast, Prec::Cast),
];

/// Longest operator spelled by adjacent tokens at the front of `tokens`
pub fn infix_operator(tokens: &[Token]) -> Option<&'static OperatorDef> {
    OPERATORS
        .iter()
        .filter(|def| spelled_by(def.spelling, tokens))
        .max_by_key(|def| def.spelling.len())
}

fn spelled_by(spelling: &[TokenKind], tokens: &[Token]) -> bool {
    if tokens.len() < spelling.len() {
        return false;
    }
    spelling
        .iter()
        .zip(tokens)
        .all(|(kind, token)| token.kind == *kind)
        && tokens[..spelling.len()]
            .windows(2)
            .all(|pair| pair[0].span.end == pair[1].span.start)
}

/// Operators occupying one tier
pub fn tier_operators(prec: Prec) -> impl Iterator<Item = &'static OperatorDef> {
    OPERATORS.iter().filter(move |def| def.prec == prec)
}

pub fn prefix_operator(kind: TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Not => Some(UnaryOp::Not),
        TokenKind::Tilde => Some(UnaryOp::Inv),
        TokenKind::Star => Some(UnaryOp::Deref),
        _ => None,
    }
}

// ==================== KEYWORD SETS ====================

/// Keywords that may stand as a path segment
pub const PATH_KEYWORDS: &[TokenKind] = &[T::SelfValue, T::Super, T::Party];

/// Tokens that open an item
pub const ITEM_KEYWORDS: &[TokenKind] = &[
    T::Func,
    T::Struct,
    T::Enum,
    T::Type,
    T::Mod,
    T::Use,
    T::Trait,
    T::Impl,
    T::Const,
    T::Pub,
];

/// Keywords that open a statement other than an item
pub const STATEMENT_KEYWORDS: &[TokenKind] = &[
    T::Let,
    T::While,
    T::For,
    T::Loop,
    T::If,
    T::Match,
    T::Return,
    T::Break,
    T::Continue,
];

pub fn starts_item(kind: TokenKind) -> bool {
    ITEM_KEYWORDS.contains(&kind)
}

/// Synchronization points for error recovery
pub fn starts_statement(kind: TokenKind) -> bool {
    starts_item(kind) || STATEMENT_KEYWORDS.contains(&kind)
}

pub fn starts_path(kind: TokenKind) -> bool {
    kind == T::Ident || kind == T::ColonColon || PATH_KEYWORDS.contains(&kind)
}

pub fn can_begin_expr(kind: TokenKind) -> bool {
    kind.is_literal()
        || starts_path(kind)
        || prefix_operator(kind).is_some()
        || matches!(
            kind,
            T::LParen
                | T::LBracket
                | T::LBrace
                | T::Amp
                | T::If
                | T::Match
                | T::Loop
                | T::While
                | T::For
                | T::Return
                | T::Break
                | T::Continue
                | T::Error
        )
}

/// Tokens that could start the right operand of a comparison after a
/// tentative generic list; block and keyword-led expressions are excluded
pub fn continues_comparison(kind: TokenKind) -> bool {
    kind.is_literal()
        || starts_path(kind)
        || matches!(
            kind,
            T::LParen | T::LBracket | T::Minus | T::Not | T::Tilde | T::Star | T::Amp
        )
}

// ==================== PRIMITIVE TYPES ====================

pub static PRIMITIVE_TYPES: &[(&str, PrimTy)] = &[
    ("bool", PrimTy::Bool),
    ("i8", PrimTy::Int(IntTy::I8)),
    ("i16", PrimTy::Int(IntTy::I16)),
    ("i32", PrimTy::Int(IntTy::I32)),
    ("i64", PrimTy::Int(IntTy::I64)),
    ("i128", PrimTy::Int(IntTy::I128)),
    ("int", PrimTy::Int(IntTy::Int)),
    ("u8", PrimTy::Uint(UintTy::U8)),
    ("u16", PrimTy::Uint(UintTy::U16)),
    ("u32", PrimTy::Uint(UintTy::U32)),
    ("u64", PrimTy::Uint(UintTy::U64)),
    ("u128", PrimTy::Uint(UintTy::U128)),
    ("uint", PrimTy::Uint(UintTy::Uint)),
    ("f32", PrimTy::Float(FloatTy::F32)),
    ("f64", PrimTy::Float(FloatTy::F64)),
    ("char", PrimTy::Char),
    ("str", PrimTy::Str),
];

pub fn primitive_type(name: &str) -> Option<PrimTy> {
    PRIMITIVE_TYPES
        .iter()
        .find(|(text, _)| *text == name)
        .map(|(_, prim)| *prim)
}

pub fn primitive_name(prim: PrimTy) -> &'static str {
    PRIMITIVE_TYPES
        .iter()
        .find(|(_, p)| *p == prim)
        .map(|(text, _)| *text)
        .unwrap_or("?")
}

pub fn is_int_suffix(name: &str) -> bool {
    matches!(
        primitive_type(name),
        Some(PrimTy::Int(_) | PrimTy::Uint(_))
    )
}

pub fn is_float_suffix(name: &str) -> bool {
    matches!(primitive_type(name), Some(PrimTy::Float(_)))
}

// ==================== AMBIGUITIES ====================

/// Grammar slot the parser is filling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Expr,
    Pattern,
    Type,
    Stmt,
}

/// Leading token shape shared by more than one construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lead {
    Ident,
    LParen,
    /// `<` right after a path
    PathLt,
    /// `::<`
    Turbofish,
    ItemKeyword,
}

/// The readings a lead can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interpretation {
    PathExpr,
    Lambda,
    Unit,
    Paren,
    Tuple,
    Binding,
    PathPattern,
    Comparison,
    GenericArgs,
    TypePath,
    ExprStmt,
    Item,
}

/// How the parser picks among the readings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The grammar position alone decides
    ByPosition(Interpretation),
    /// Decide on the token right after the lead
    Lookahead {
        next: &'static [TokenKind],
        then: Interpretation,
        otherwise: Interpretation,
    },
    /// Parse `attempt` speculatively, roll back to `fallback` on failure
    Speculate {
        attempt: Interpretation,
        fallback: Interpretation,
    },
    /// Element count and trailing comma decide, see [`arity`]
    Arity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ambiguity {
    pub position: Position,
    pub lead: Lead,
    pub candidates: &'static [Interpretation],
    pub resolution: Resolution,
}

pub static AMBIGUITIES: &[Ambiguity] = &[
    Ambiguity {
        position: Position::Expr,
        lead: Lead::Ident,
        candidates: &[I::PathExpr, I::Lambda],
        resolution: Resolution::Lookahead {
            next: &[T::Arrow],
            then: I::Lambda,
            otherwise: I::PathExpr,
        },
    },
    Ambiguity {
        position: Position::Expr,
        lead: Lead::LParen,
        candidates: &[I::Lambda, I::Unit, I::Paren, I::Tuple],
        resolution: Resolution::Speculate {
            attempt: I::Lambda,
            fallback: I::Paren,
        },
    },
    Ambiguity {
        position: Position::Expr,
        lead: Lead::PathLt,
        candidates: &[I::Comparison, I::GenericArgs],
        resolution: Resolution::ByPosition(I::Comparison),
    },
    Ambiguity {
        position: Position::Expr,
        lead: Lead::Turbofish,
        candidates: &[I::GenericArgs],
        resolution: Resolution::ByPosition(I::GenericArgs),
    },
    Ambiguity {
        position: Position::Pattern,
        lead: Lead::Ident,
        candidates: &[I::Binding, I::PathPattern, I::PathExpr],
        resolution: Resolution::Lookahead {
            next: &[T::ColonColon, T::LParen, T::LBrace],
            then: I::PathPattern,
            otherwise: I::Binding,
        },
    },
    Ambiguity {
        position: Position::Pattern,
        lead: Lead::LParen,
        candidates: &[I::Unit, I::Paren, I::Tuple],
        resolution: Resolution::Arity,
    },
    Ambiguity {
        position: Position::Type,
        lead: Lead::PathLt,
        candidates: &[I::GenericArgs, I::TypePath],
        resolution: Resolution::Speculate {
            attempt: I::GenericArgs,
            fallback: I::TypePath,
        },
    },
    Ambiguity {
        position: Position::Type,
        lead: Lead::LParen,
        candidates: &[I::Unit, I::Paren, I::Tuple],
        resolution: Resolution::Arity,
    },
    Ambiguity {
        position: Position::Stmt,
        lead: Lead::Ident,
        candidates: &[I::ExprStmt, I::Item],
        resolution: Resolution::ByPosition(I::ExprStmt),
    },
    Ambiguity {
        position: Position::Stmt,
        lead: Lead::ItemKeyword,
        candidates: &[I::Item, I::ExprStmt],
        resolution: Resolution::ByPosition(I::Item),
    },
];

pub fn resolution(position: Position, lead: Lead) -> Option<Resolution> {
    AMBIGUITIES
        .iter()
        .find(|a| a.position == position && a.lead == lead)
        .map(|a| a.resolution)
}

/// `()` is unit, one element without a trailing comma is parenthesized,
/// anything else is a tuple
pub fn arity(elements: usize, trailing_comma: bool) -> Interpretation {
    match (elements, trailing_comma) {
        (0, _) => I::Unit,
        (1, false) => I::Paren,
        _ => I::Tuple,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ladder_matches_declaration_order() {
        for pair in Prec::LADDER.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].tighter(), Some(pair[1]));
        }
        assert_eq!(Prec::Path.tighter(), None);
    }

    #[test]
    fn every_operator_in_exactly_one_tier() {
        let mut seen = HashSet::new();
        for def in OPERATORS {
            assert!(seen.insert(def.op), "{:?} listed twice", def.op);
            assert!(def.prec.is_infix());
        }
        let mut spellings = HashSet::new();
        for def in OPERATORS {
            assert!(spellings.insert(def.spelling), "{:?} spelled twice", def.spelling);
        }
    }

    #[test]
    fn every_infix_tier_is_occupied() {
        for prec in Prec::LADDER.iter().filter(|p| p.is_infix()) {
            assert!(tier_operators(*prec).next().is_some(), "{prec:?} is empty");
        }
    }

    #[test]
    fn ambiguity_entries_are_unique_and_consistent() {
        let mut keys = HashSet::new();
        for entry in AMBIGUITIES {
            assert!(keys.insert((entry.position, entry.lead)));
            let picks: Vec<Interpretation> = match entry.resolution {
                Resolution::ByPosition(i) => vec![i],
                Resolution::Lookahead { then, otherwise, .. } => vec![then, otherwise],
                Resolution::Speculate { attempt, fallback } => vec![attempt, fallback],
                Resolution::Arity => vec![I::Unit, I::Paren, I::Tuple],
            };
            for pick in picks {
                assert!(entry.candidates.contains(&pick), "{entry:?}");
            }
        }
    }

    #[test]
    fn identifier_is_both_binding_and_path_expression() {
        let pattern = AMBIGUITIES
            .iter()
            .find(|a| a.position == Position::Pattern && a.lead == Lead::Ident)
            .unwrap();
        assert!(pattern.candidates.contains(&I::Binding));
        assert!(pattern.candidates.contains(&I::PathExpr));
    }

    #[test]
    fn suffix_tables() {
        assert!(is_int_suffix("u8"));
        assert!(is_int_suffix("int"));
        assert!(!is_int_suffix("f32"));
        assert!(is_float_suffix("f64"));
        assert!(!is_float_suffix("bool"));
        assert_eq!(primitive_name(PrimTy::Uint(UintTy::Uint)), "uint");
    }

    #[test]
    fn arity_rule() {
        assert_eq!(arity(0, false), I::Unit);
        assert_eq!(arity(1, false), I::Paren);
        assert_eq!(arity(1, true), I::Tuple);
        assert_eq!(arity(2, false), I::Tuple);
    }
}
