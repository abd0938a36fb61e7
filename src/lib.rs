//! Jacy syntax front end
//!
//! Lexer and recursive descent parser for the Jacy programming language.
//!
//! # Architecture
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST + Diagnostics
//! ```
//!
//! Parsing is total: every input yields a tree, with malformed regions replaced
//! by `Error` nodes and described by diagnostics. The operator precedence
//! ladder and every place where a leading token has more than one reading are
//! data in [`grammar`].
//!
//! # Example
//!
//! ```
//! let parsed = jacy_syntax::parse_file("func main() { let x = 1 + 2 * 3; }");
//! assert!(parsed.diagnostics.is_empty());
//! assert_eq!(parsed.node.items.len(), 1);
//! ```

pub mod ast;
pub mod common;
pub mod config;
pub mod diagnostics;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod sourcemap;

pub use common::{Interner, Span, Symbol};
pub use config::{LexConfig, ParseConfig};
pub use diagnostics::{Diagnostic, Diagnostics, ParseError, Severity};
pub use sourcemap::{SourceDb, SourceFile};

use lexer::Token;

/// Version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A parsed node with its diagnostics and the interner that resolves its symbols
#[derive(Debug)]
pub struct Parsed<T> {
    pub node: T,
    /// Lexer diagnostics first, then parser diagnostics, each in detection order
    pub diagnostics: Diagnostics,
    pub interner: Interner,
}

impl<T> Parsed<T> {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Text of a symbol in the tree
    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.interner.resolve(symbol)
    }
}

/// Parse a source file with the default configuration
pub fn parse_file(source: &str) -> Parsed<ast::File> {
    parse_file_with(source, &ParseConfig::default())
}

pub fn parse_file_with(source: &str, config: &ParseConfig) -> Parsed<ast::File> {
    run(source, config, parser::parse)
}

/// Parse a single expression
pub fn parse_expr(source: &str) -> Parsed<ast::Expr> {
    run(source, &ParseConfig::default(), parser::parse_expr)
}

/// Parse a single type
pub fn parse_type(source: &str) -> Parsed<ast::Ty> {
    run(source, &ParseConfig::default(), parser::parse_type)
}

/// Parse a single pattern
pub fn parse_pattern(source: &str) -> Parsed<ast::Pat> {
    run(source, &ParseConfig::default(), parser::parse_pattern)
}

fn run<T>(
    source: &str,
    config: &ParseConfig,
    parse: impl FnOnce(&[Token], &Interner, &ParseConfig) -> (T, Diagnostics),
) -> Parsed<T> {
    let mut interner = Interner::new();
    let lexed = lexer::lex(source, &mut interner, &config.lex_config());
    let (node, parse_diagnostics) = parse(&lexed.tokens, &interner, config);
    let mut diagnostics = Diagnostics::new();
    diagnostics.extend(lexed.diagnostics);
    diagnostics.extend(parse_diagnostics.into_vec());
    Parsed {
        node,
        diagnostics,
        interner,
    }
}
