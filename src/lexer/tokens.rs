//! Token definitions for the Jacy lexer

use crate::common::{Span, Symbol};
use logos::Logos;
use serde::{Deserialize, Serialize};

/// A token with its kind, span and interned text
///
/// Literal tokens intern their body: strings and chars without quotes,
/// numbers as written minus any fused type suffix, which lands in `suffix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub symbol: Symbol,
    pub suffix: Option<Symbol>,
}

/// Token kinds recognized by the lexer
///
/// `>` never combines with a following `>` or `=` here; the parser glues
/// adjacent tokens back into `>>`, `>=` and `>>=` where an operator is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Serialize, Deserialize)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum TokenKind {
    // Keywords
    #[token("and")]
    And,
    #[token("as")]
    As,
    #[token("break")]
    Break,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("enum")]
    Enum,
    #[token("false")]
    False,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("if")]
    If,
    #[token("impl")]
    Impl,
    #[token("in")]
    In,
    #[token("let")]
    Let,
    #[token("loop")]
    Loop,
    #[token("match")]
    Match,
    #[token("mod")]
    Mod,
    #[token("mut")]
    Mut,
    #[token("not")]
    Not,
    #[token("or")]
    Or,
    #[token("party")]
    Party,
    #[token("pub")]
    Pub,
    #[token("ref")]
    Ref,
    #[token("return")]
    Return,
    #[token("self")]
    SelfValue,
    #[token("struct")]
    Struct,
    #[token("super")]
    Super,
    #[token("trait")]
    Trait,
    #[token("true")]
    True,
    #[token("type")]
    Type,
    #[token("use")]
    Use,
    #[token("while")]
    While,

    // Literals
    #[regex(r"[0-9][0-9_]*", priority = 2)]
    IntLit,
    #[regex(r"0x[0-9a-fA-F][0-9a-fA-F_]*")]
    HexLit,
    #[regex(r"0b[01][01_]*")]
    BinLit,
    #[regex(r"0o[0-7][0-7_]*")]
    OctLit,
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*")]
    FloatLit,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLit,
    /// A string missing its closing quote, cut at the end of the line
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedString,
    #[regex(r"'([^'\\\n]|\\.|\\u\{[0-9a-fA-F]+\})'")]
    CharLit,
    #[regex(r"'[a-zA-Z_][a-zA-Z0-9_]*")]
    Lifetime,

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", priority = 1)]
    Ident,

    // Arithmetic operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    StarStar,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // Bitwise operators
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<<")]
    Shl,

    // Comparison operators
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token("<=>")]
    Spaceship,
    #[token(">")]
    Gt,

    // Assignment operators
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("**=")]
    StarStarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,

    // Other operators
    #[token("!")]
    Bang,
    #[token("|>")]
    PipeGt,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token("?")]
    Question,
    #[token("@")]
    At,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token(".")]
    Dot,
    #[token("..")]
    DotDot,
    #[token("..=")]
    DotDotEq,
    #[token("_", priority = 2)]
    Underscore,

    // Trivia
    #[token("\n")]
    Newline,
    #[token("/*", block_comment)]
    BlockComment,

    /// Unrecognized or malformed input
    Error,
    Eof,
}

/// Consume a block comment body, `/*` already matched; comments nest
fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    let bytes = rest.as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1)) {
            (b'*', Some(b'/')) => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    lex.bump(i);
                    return true;
                }
            }
            (b'/', Some(b'*')) => {
                depth += 1;
                i += 2;
            }
            _ => i += 1,
        }
    }
    lex.bump(rest.len());
    false
}

impl TokenKind {
    /// Check if this token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::As
                | TokenKind::Break
                | TokenKind::Const
                | TokenKind::Continue
                | TokenKind::Elif
                | TokenKind::Else
                | TokenKind::Enum
                | TokenKind::False
                | TokenKind::For
                | TokenKind::Func
                | TokenKind::If
                | TokenKind::Impl
                | TokenKind::In
                | TokenKind::Let
                | TokenKind::Loop
                | TokenKind::Match
                | TokenKind::Mod
                | TokenKind::Mut
                | TokenKind::Not
                | TokenKind::Or
                | TokenKind::Party
                | TokenKind::Pub
                | TokenKind::Ref
                | TokenKind::Return
                | TokenKind::SelfValue
                | TokenKind::Struct
                | TokenKind::Super
                | TokenKind::Trait
                | TokenKind::True
                | TokenKind::Type
                | TokenKind::Use
                | TokenKind::While
                | TokenKind::Underscore
        )
    }

    /// Check if this token is a literal
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::IntLit
                | TokenKind::HexLit
                | TokenKind::BinLit
                | TokenKind::OctLit
                | TokenKind::FloatLit
                | TokenKind::StringLit
                | TokenKind::CharLit
                | TokenKind::True
                | TokenKind::False
        )
    }

    pub fn is_numeric_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::IntLit
                | TokenKind::HexLit
                | TokenKind::BinLit
                | TokenKind::OctLit
                | TokenKind::FloatLit
        )
    }

    /// Whitespace-like tokens the parser never sees as grammar
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::BlockComment)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::And => "and",
            TokenKind::As => "as",
            TokenKind::Break => "break",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Elif => "elif",
            TokenKind::Else => "else",
            TokenKind::Enum => "enum",
            TokenKind::False => "false",
            TokenKind::For => "for",
            TokenKind::Func => "func",
            TokenKind::If => "if",
            TokenKind::Impl => "impl",
            TokenKind::In => "in",
            TokenKind::Let => "let",
            TokenKind::Loop => "loop",
            TokenKind::Match => "match",
            TokenKind::Mod => "mod",
            TokenKind::Mut => "mut",
            TokenKind::Not => "not",
            TokenKind::Or => "or",
            TokenKind::Party => "party",
            TokenKind::Pub => "pub",
            TokenKind::Ref => "ref",
            TokenKind::Return => "return",
            TokenKind::SelfValue => "self",
            TokenKind::Struct => "struct",
            TokenKind::Super => "super",
            TokenKind::Trait => "trait",
            TokenKind::True => "true",
            TokenKind::Type => "type",
            TokenKind::Use => "use",
            TokenKind::While => "while",
            TokenKind::IntLit => "integer literal",
            TokenKind::HexLit => "hex literal",
            TokenKind::BinLit => "binary literal",
            TokenKind::OctLit => "octal literal",
            TokenKind::FloatLit => "float literal",
            TokenKind::StringLit => "string literal",
            TokenKind::UnterminatedString => "unterminated string",
            TokenKind::CharLit => "char literal",
            TokenKind::Lifetime => "lifetime",
            TokenKind::Ident => "identifier",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::Shl => "<<",
            TokenKind::EqEq => "==",
            TokenKind::BangEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Spaceship => "<=>",
            TokenKind::Gt => ">",
            TokenKind::Eq => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::StarStarEq => "**=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::AmpEq => "&=",
            TokenKind::PipeEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::ShlEq => "<<=",
            TokenKind::Bang => "!",
            TokenKind::PipeGt => "|>",
            TokenKind::Arrow => "->",
            TokenKind::FatArrow => "=>",
            TokenKind::Question => "?",
            TokenKind::At => "@",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semi => ";",
            TokenKind::Colon => ":",
            TokenKind::ColonColon => "::",
            TokenKind::Dot => ".",
            TokenKind::DotDot => "..",
            TokenKind::DotDotEq => "..=",
            TokenKind::Underscore => "_",
            TokenKind::Newline => "newline",
            TokenKind::BlockComment => "comment",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of input",
        }
    }

    /// How the token reads in a diagnostic: punctuation and keywords quoted
    pub fn describe(&self) -> String {
        match self {
            TokenKind::IntLit
            | TokenKind::HexLit
            | TokenKind::BinLit
            | TokenKind::OctLit
            | TokenKind::FloatLit
            | TokenKind::StringLit
            | TokenKind::UnterminatedString
            | TokenKind::CharLit
            | TokenKind::Lifetime
            | TokenKind::Ident
            | TokenKind::Newline
            | TokenKind::BlockComment
            | TokenKind::Error
            | TokenKind::Eof => self.as_str().to_string(),
            _ => format!("`{}`", self.as_str()),
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
