//! Parser for the Jacy language
//!
//! A recursive descent parser that produces an AST from a token stream.
//! Expressions use precedence climbing over [`grammar::OPERATORS`]; every
//! place where a leading token admits more than one reading consults
//! [`grammar::AMBIGUITIES`].
//!
//! Parsing never aborts. Failures are recorded as diagnostics at the point of
//! detection and the malformed statement or item becomes an `Error` node.

mod cursor;
mod expr;
mod item;
mod pat;
mod path;
mod stmt;
mod ty;

use crate::ast::*;
use crate::common::{IdGenerator, Interner, NodeId, Span};
use crate::config::ParseConfig;
use crate::diagnostics::{Diagnostics, ErrorGuaranteed, ParseError};
use crate::grammar;
use crate::lexer::{Token, TokenKind};
use cursor::{Cursor, CursorPos};

pub(crate) type PResult<T> = Result<T, ErrorGuaranteed>;

/// Parse a whole file
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &[Token], interner: &Interner, config: &ParseConfig) -> (File, Diagnostics) {
    let mut parser = Parser::new(tokens, interner, config);
    let file = parser.parse_file();
    tracing::debug!(
        items = file.items.len(),
        nodes = parser.id_gen.count(),
        diagnostics = parser.diagnostics.len(),
        "parsed file"
    );
    (file, parser.diagnostics)
}

/// Parse the whole token stream as one expression
pub fn parse_expr(tokens: &[Token], interner: &Interner, config: &ParseConfig) -> (Expr, Diagnostics) {
    fragment(tokens, interner, config, "expression", Parser::parse_expr, |p, span| {
        p.mk_expr(ExprKind::Error, span)
    })
}

/// Parse the whole token stream as one type
pub fn parse_type(tokens: &[Token], interner: &Interner, config: &ParseConfig) -> (Ty, Diagnostics) {
    fragment(tokens, interner, config, "type", Parser::parse_ty, |p, span| {
        p.mk_ty(TyKind::Error, span)
    })
}

/// Parse the whole token stream as one pattern
pub fn parse_pattern(tokens: &[Token], interner: &Interner, config: &ParseConfig) -> (Pat, Diagnostics) {
    fragment(tokens, interner, config, "pattern", Parser::parse_pat, |p, span| {
        p.mk_pat(PatKind::Error, span)
    })
}

fn fragment<'a, T>(
    tokens: &'a [Token],
    interner: &'a Interner,
    config: &'a ParseConfig,
    what: &str,
    parse: impl FnOnce(&mut Parser<'a>) -> PResult<T>,
    error_node: impl FnOnce(&mut Parser<'a>, Span) -> T,
) -> (T, Diagnostics) {
    let mut parser = Parser::new(tokens, interner, config);
    let start = parser.span();
    let node = match parse(&mut parser) {
        Ok(node) if parser.at(TokenKind::Eof) => node,
        Ok(_) => {
            let _ = parser.unexpected(format!("end of {what}"));
            parser.skip_to_eof();
            let span = start.to(parser.prev_span());
            error_node(&mut parser, span)
        }
        Err(_) => {
            parser.skip_to_eof();
            let span = start.to(parser.prev_span());
            error_node(&mut parser, span)
        }
    };
    (node, parser.diagnostics)
}

/// An open delimiter waiting for its closing token
#[derive(Debug, Clone, Copy)]
struct Delim {
    close: TokenKind,
    open: Span,
    construct: &'static str,
}

/// Everything speculation has to put back
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    cursor: CursorPos,
    diagnostics: usize,
    delims: usize,
    fatal: bool,
}

/// Parser state
struct Parser<'a> {
    cursor: Cursor<'a>,
    interner: &'a Interner,
    config: &'a ParseConfig,
    diagnostics: Diagnostics,
    id_gen: IdGenerator,
    delims: Vec<Delim>,
    depth: usize,
    /// Input ran out inside an open construct; later failures stay silent
    fatal: bool,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], interner: &'a Interner, config: &'a ParseConfig) -> Self {
        Self {
            cursor: Cursor::new(tokens),
            interner,
            config,
            diagnostics: Diagnostics::new(),
            id_gen: IdGenerator::new(),
            delims: Vec::new(),
            depth: 0,
            fatal: false,
        }
    }

    fn next_id(&mut self) -> NodeId {
        self.id_gen.next()
    }

    fn peek(&self) -> TokenKind {
        self.cursor.kind()
    }

    fn peek_n(&self, n: usize) -> TokenKind {
        self.cursor.nth(n)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn at_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.peek())
    }

    fn span(&self) -> Span {
        self.cursor.span()
    }

    fn prev_span(&self) -> Span {
        self.cursor.prev_span()
    }

    /// Consume the current token and return its span
    fn advance(&mut self) -> Span {
        self.cursor.bump()
    }

    /// Consume the current token and return it whole
    fn advance_token(&mut self) -> Option<Token> {
        let token = self.cursor.token().copied();
        self.cursor.bump();
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<Span> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    // ==================== NODES ====================

    fn mk_expr(&mut self, kind: ExprKind, span: Span) -> Expr {
        Expr {
            id: self.next_id(),
            kind,
            span,
        }
    }

    fn mk_pat(&mut self, kind: PatKind, span: Span) -> Pat {
        Pat {
            id: self.next_id(),
            kind,
            span,
        }
    }

    fn mk_ty(&mut self, kind: TyKind, span: Span) -> Ty {
        Ty {
            id: self.next_id(),
            kind,
            span,
        }
    }

    fn mk_stmt(&mut self, kind: StmtKind, span: Span) -> Stmt {
        Stmt {
            id: self.next_id(),
            kind,
            span,
        }
    }

    fn parse_ident(&mut self) -> PResult<Ident> {
        match self.cursor.token().copied() {
            Some(token) if token.kind == TokenKind::Ident => {
                self.advance();
                Ok(Ident {
                    name: token.symbol,
                    span: token.span,
                })
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn parse_lifetime(&mut self) -> PResult<Lifetime> {
        match self.cursor.token().copied() {
            Some(token) if token.kind == TokenKind::Lifetime => {
                self.advance();
                Ok(Lifetime {
                    name: token.symbol,
                    span: token.span,
                })
            }
            _ => Err(self.unexpected("lifetime")),
        }
    }

    // ==================== DIAGNOSTICS ====================

    fn error(&mut self, span: Span, error: ParseError) -> ErrorGuaranteed {
        self.diagnostics.error(span, error)
    }

    /// Report the current token as not being `expected`
    ///
    /// Lexer error tokens were reported already, and running out of input
    /// inside a delimiter is reported once as an unterminated construct.
    fn unexpected(&mut self, expected: impl Into<String>) -> ErrorGuaranteed {
        if self.fatal || self.at(TokenKind::Error) {
            return ErrorGuaranteed::already_reported();
        }
        if self.at(TokenKind::Eof) {
            if let Some(delim) = self.delims.last().copied() {
                return self.unterminated(delim);
            }
        }
        let span = self.span();
        let found = self.found();
        self.error(
            span,
            ParseError::UnexpectedToken {
                expected: expected.into(),
                found,
                span: span.into(),
            },
        )
    }

    fn found(&self) -> String {
        match self.cursor.token() {
            Some(token) if token.kind == TokenKind::Ident => {
                format!("identifier `{}`", self.interner.resolve(token.symbol))
            }
            _ => self.peek().describe(),
        }
    }

    fn unterminated(&mut self, delim: Delim) -> ErrorGuaranteed {
        self.fatal = true;
        let eof = self.span();
        tracing::debug!(construct = delim.construct, "input ended inside construct");
        self.error(
            delim.open.to(eof),
            ParseError::UnterminatedConstruct {
                construct: delim.construct.to_string(),
                open: delim.open.into(),
                span: eof.into(),
            },
        )
    }

    fn misplaced(&mut self, span: Span, message: impl Into<String>, help: Option<&str>) -> ErrorGuaranteed {
        self.error(
            span,
            ParseError::Misplaced {
                message: message.into(),
                span: span.into(),
                help: help.map(str::to_string),
            },
        )
    }

    fn lint(&mut self, span: Span, message: impl Into<String>) {
        self.diagnostics.warn(
            span,
            ParseError::Lint {
                message: message.into(),
                span: span.into(),
            },
        );
    }

    // ==================== NESTING ====================

    /// Run `f` one nesting level deeper, failing past the recursion limit
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let limit = self.config.recursion_limit;
        if self.depth >= limit {
            if self.fatal {
                return Err(ErrorGuaranteed::already_reported());
            }
            let span = self.span();
            return Err(self.error(
                span,
                ParseError::RecursionLimit {
                    limit,
                    span: span.into(),
                },
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// `open f close`, returning what `f` produced and the whole span
    fn delimited<T>(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        construct: &'static str,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<(T, Span)> {
        let open_span = self.expect(open)?;
        let depth = self.delims.len();
        self.delims.push(Delim {
            close,
            open: open_span,
            construct,
        });
        let result = f(self).and_then(|value| {
            let close_span = self.expect(close)?;
            Ok((value, close_span))
        });
        self.delims.truncate(depth);
        let (value, close_span) = result?;
        Ok((value, open_span.to(close_span)))
    }

    /// `elem (, elem)* [,]` up to `close`, which is left for the caller.
    /// Also reports whether the list ended with a comma.
    fn comma_list<T>(
        &mut self,
        close: TokenKind,
        mut elem: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<(Vec<T>, bool)> {
        let mut elems = Vec::new();
        let mut trailing = false;
        while !self.at(close) && !self.at(TokenKind::Eof) {
            elems.push(elem(self)?);
            trailing = self.eat(TokenKind::Comma);
            if !trailing {
                break;
            }
        }
        Ok((elems, trailing))
    }

    /// A line break ends the current statement when semicolons are elided,
    /// unless it sits inside parentheses, brackets or angle brackets
    fn newline_terminates(&self) -> bool {
        self.config.elide_semicolons
            && self.cursor.newline_before()
            && self
                .delims
                .last()
                .is_none_or(|delim| delim.close == TokenKind::RBrace)
    }

    /// Consume a statement terminator; with elided semicolons a line break,
    /// a closing brace or the end of input also ends the statement
    fn expect_terminator(&mut self, after: &str) -> PResult<()> {
        if self.eat(TokenKind::Semi) {
            return Ok(());
        }
        if self.config.elide_semicolons
            && (self.newline_terminates() || self.at_any(&[TokenKind::RBrace, TokenKind::Eof]))
        {
            return Ok(());
        }
        Err(self.unexpected(format!("`;` after {after}")))
    }

    // ==================== SPECULATION ====================

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            cursor: self.cursor.pos(),
            diagnostics: self.diagnostics.len(),
            delims: self.delims.len(),
            fatal: self.fatal,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.cursor.restore(snapshot.cursor);
        self.diagnostics.truncate(snapshot.diagnostics);
        self.delims.truncate(snapshot.delims);
        self.fatal = snapshot.fatal;
    }

    // ==================== RECOVERY ====================

    /// Skip to the next synchronization point: past a `;`, or up to a `}` or a
    /// token that opens a statement or item. Nested delimiters are skipped as
    /// a whole, and at least one token is consumed when `start` is current.
    fn synchronize(&mut self, start: CursorPos) {
        let mut depth = 0usize;
        loop {
            let kind = self.peek();
            match kind {
                TokenKind::Eof => break,
                TokenKind::Semi if depth == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::RBrace if depth == 0 => break,
                k if depth == 0 && grammar::starts_statement(k) && self.cursor.pos() != start => break,
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
        }
        if self.cursor.pos() == start {
            self.advance();
        }
        tracing::trace!(skipped_to = %self.span(), "synchronized");
    }

    /// Skip up to `stop` at nesting depth zero, consuming a `,` found first
    fn skip_to_separator(&mut self, stop: TokenKind) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                TokenKind::Eof => break,
                k if k == stop && depth == 0 => break,
                TokenKind::Comma if depth == 0 => {
                    self.advance();
                    break;
                }
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn skip_to_eof(&mut self) {
        while !self.at(TokenKind::Eof) {
            self.advance();
        }
    }
}
