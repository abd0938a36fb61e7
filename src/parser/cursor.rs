//! Token cursor
//!
//! Walks the lexer's token stream, stepping over trivia so the parser only
//! sees grammar tokens. Whether a line break preceded the current token stays
//! observable for semicolon elision.

use crate::common::Span;
use crate::lexer::{Token, TokenKind};

/// Saved cursor position for speculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct CursorPos {
    pos: usize,
    prev_span: Span,
}

pub(super) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    prev_span: Span,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(tokens: &'a [Token]) -> Self {
        let mut cursor = Self {
            tokens,
            pos: 0,
            prev_span: Span::default(),
        };
        cursor.skip_trivia();
        let start = cursor.span().start;
        cursor.prev_span = Span::new(start, start);
        cursor
    }

    /// The current token; `None` only for a stream without `Eof`
    pub(super) fn token(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub(super) fn kind(&self) -> TokenKind {
        self.token().map_or(TokenKind::Eof, |t| t.kind)
    }

    pub(super) fn span(&self) -> Span {
        match self.token() {
            Some(token) => token.span,
            None => {
                let end = self.tokens.last().map_or(0, |t| t.span.end);
                Span::new(end, end)
            }
        }
    }

    /// Kind of the `n`th grammar token after the current one
    pub(super) fn nth(&self, n: usize) -> TokenKind {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Tokens from the current one on, trivia included
    pub(super) fn rest(&self) -> &'a [Token] {
        &self.tokens[self.pos.min(self.tokens.len())..]
    }

    pub(super) fn prev_span(&self) -> Span {
        self.prev_span
    }

    /// Step past the current token; `Eof` is never consumed
    pub(super) fn bump(&mut self) -> Span {
        let span = self.span();
        if self.kind() != TokenKind::Eof {
            self.prev_span = span;
            self.pos += 1;
            self.skip_trivia();
        }
        span
    }

    /// A line break sits between the previous grammar token and this one
    pub(super) fn newline_before(&self) -> bool {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .is_some_and(|t| t.kind == TokenKind::Newline)
    }

    pub(super) fn pos(&self) -> CursorPos {
        CursorPos {
            pos: self.pos,
            prev_span: self.prev_span,
        }
    }

    pub(super) fn restore(&mut self, saved: CursorPos) {
        self.pos = saved.pos;
        self.prev_span = saved.prev_span;
    }

    fn skip_trivia(&mut self) {
        while self.token().is_some_and(|t| t.kind.is_trivia()) {
            self.pos += 1;
        }
    }
}
