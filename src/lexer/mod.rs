//! Lexer for the Jacy language
//!
//! Built on logos. [`lex`] is total: malformed input becomes `Error` tokens plus
//! diagnostics, and the stream always ends with `Eof`.

pub mod tokens;

pub use tokens::{Token, TokenKind};

use crate::common::{Interner, Span, Symbol};
use crate::config::LexConfig;
use crate::diagnostics::{Diagnostic, LexErrorKind, ParseError};
use crate::grammar;
use logos::Logos;
use std::ops::Range;

/// Tokens and lexical diagnostics of one source text
#[derive(Debug, Clone)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LexOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Token kinds without the trailing `Eof`
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens
            .iter()
            .map(|t| t.kind)
            .filter(|k| *k != TokenKind::Eof)
            .collect()
    }
}

/// Tokenize `source`, interning token text into `interner`
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn lex(source: &str, interner: &mut Interner, config: &LexConfig) -> LexOutput {
    let raw: Vec<(Result<TokenKind, ()>, Range<usize>)> = TokenKind::lexer(source).spanned().collect();
    let mut lexer = Lexer {
        source,
        interner,
        config,
        tokens: Vec::with_capacity(raw.len() + 1),
        diagnostics: Vec::new(),
    };
    lexer.run(&raw);
    tracing::debug!(
        tokens = lexer.tokens.len(),
        errors = lexer.diagnostics.len(),
        "lexed"
    );
    LexOutput {
        tokens: lexer.tokens,
        diagnostics: lexer.diagnostics,
    }
}

struct Lexer<'a> {
    source: &'a str,
    interner: &'a mut Interner,
    config: &'a LexConfig,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    fn run(&mut self, raw: &[(Result<TokenKind, ()>, Range<usize>)]) {
        let source = self.source;
        let mut i = 0;
        while i < raw.len() {
            let (kind, range) = (&raw[i].0, raw[i].1.clone());
            match kind {
                Ok(TokenKind::BlockComment) => {}
                Ok(TokenKind::Newline) => {
                    if self.config.retain_newlines {
                        self.push(TokenKind::Newline, range.clone(), "\n", None);
                    }
                }
                Ok(TokenKind::UnterminatedString) => {
                    let body = &source[range.start + 1..range.end];
                    self.error(
                        range.clone(),
                        LexErrorKind::UnterminatedString,
                        "missing closing `\"` before the end of the line".to_string(),
                    );
                    self.push(TokenKind::Error, range.clone(), body, None);
                }
                Ok(kind) if kind.is_numeric_literal() && Self::glued_digits(raw, i) => {
                    i = self.invalid_digits(*kind, raw, i);
                }
                Ok(kind) if kind.is_numeric_literal() => {
                    let next = raw.get(i + 1).filter(|(next_kind, next_range)| {
                        next_range.start == range.end && matches!(next_kind, Ok(TokenKind::Ident))
                    });
                    match next {
                        Some((_, suffix_range)) => {
                            self.number_with_suffix(*kind, range.clone(), suffix_range.clone());
                            i += 1;
                        }
                        None => {
                            let text = &source[range.clone()];
                            self.push(*kind, range.clone(), text, None);
                        }
                    }
                }
                Ok(kind) => {
                    let text = self.body(*kind, range.clone());
                    self.push(*kind, range.clone(), text, None);
                }
                Err(()) => {
                    let text = &source[range.clone()];
                    if text.starts_with("/*") {
                        self.error(
                            range.clone(),
                            LexErrorKind::UnterminatedBlockComment,
                            "missing `*/`".to_string(),
                        );
                    } else {
                        self.error(
                            range.clone(),
                            LexErrorKind::UnexpectedChar,
                            format!("`{}`", text.escape_debug()),
                        );
                    }
                    self.push(TokenKind::Error, range.clone(), text, None);
                }
            }
            i += 1;
        }
        let end = source.len();
        self.push(TokenKind::Eof, end..end, "", None);
    }

    /// Literal text without delimiters, everything else verbatim
    fn body(&self, kind: TokenKind, range: Range<usize>) -> &'a str {
        let text = &self.source[range];
        match kind {
            TokenKind::StringLit | TokenKind::CharLit => &text[1..text.len() - 1],
            TokenKind::Lifetime => &text[1..],
            _ => text,
        }
    }

    /// A numeric literal directly followed by another one, as in `0b102`
    fn glued_digits(raw: &[(Result<TokenKind, ()>, Range<usize>)], i: usize) -> bool {
        matches!(
            raw.get(i + 1),
            Some((Ok(next), next_range)) if next.is_numeric_literal() && next_range.start == raw[i].1.end
        )
    }

    /// Fold the literal at `i` and every adjacent digit or identifier run into
    /// one `Error` token; returns the index of the last token folded
    fn invalid_digits(
        &mut self,
        kind: TokenKind,
        raw: &[(Result<TokenKind, ()>, Range<usize>)],
        i: usize,
    ) -> usize {
        let start = raw[i].1.start;
        let mut end = raw[i].1.end;
        let mut last = i;
        while let Some((Ok(next), next_range)) = raw.get(last + 1) {
            if next_range.start != end || !(next.is_numeric_literal() || *next == TokenKind::Ident) {
                break;
            }
            end = next_range.end;
            last += 1;
        }
        let source = self.source;
        let text = &source[start..end];
        self.error(
            start..end,
            LexErrorKind::InvalidDigit,
            format!("`{text}` is not a valid {} literal", base_noun(kind)),
        );
        self.push(TokenKind::Error, start..end, text, None);
        last
    }

    fn number_with_suffix(&mut self, kind: TokenKind, digits: Range<usize>, suffix: Range<usize>) {
        let source = self.source;
        let name = &source[suffix.clone()];
        let valid = match kind {
            TokenKind::FloatLit => grammar::is_float_suffix(name),
            _ => grammar::is_int_suffix(name) || grammar::is_float_suffix(name),
        };
        let whole = digits.start..suffix.end;
        if valid {
            let text = &source[digits.clone()];
            let suffix = self.interner.intern(name);
            self.push(kind, whole, text, Some(suffix));
        } else {
            self.error(
                whole.clone(),
                LexErrorKind::InvalidSuffix,
                format!("`{name}` is not a {} type", kind_noun(kind)),
            );
            let text = &source[whole.clone()];
            self.push(TokenKind::Error, whole, text, None);
        }
    }

    fn push(
        &mut self,
        kind: TokenKind,
        range: Range<usize>,
        text: &str,
        suffix: Option<Symbol>,
    ) {
        let symbol = self.interner.intern(text);
        self.tokens.push(Token {
            kind,
            span: Span::from(range),
            symbol,
            suffix,
        });
    }

    fn error(&mut self, range: Range<usize>, kind: LexErrorKind, detail: String) {
        let span = Span::from(range);
        tracing::trace!(%span, %kind, "lex error");
        self.diagnostics.push(Diagnostic::new(
            span,
            ParseError::Lex {
                kind,
                detail,
                span: span.into(),
            },
        ));
    }
}

fn base_noun(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::BinLit => "binary",
        TokenKind::OctLit => "octal",
        TokenKind::HexLit => "hexadecimal",
        TokenKind::FloatLit => "float",
        _ => "decimal",
    }
}

fn kind_noun(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::FloatLit => "float",
        _ => "numeric",
    }
}
