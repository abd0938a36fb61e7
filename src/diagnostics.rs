//! Diagnostic reporting with source locations
//!
//! Every problem the lexer or parser finds becomes a [`Diagnostic`] record in an
//! append-only [`Diagnostics`] sink. Records render through miette.

use crate::common::Span;
use crate::sourcemap::SourceFile;
use miette::SourceSpan;
use std::fmt;
use thiserror::Error;

/// Convert our Span to miette's SourceSpan
impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new((span.start as usize).into(), span.len())
    }
}

/// What went wrong while scanning characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexErrorKind {
    UnexpectedChar,
    UnterminatedString,
    UnterminatedBlockComment,
    InvalidSuffix,
    InvalidDigit,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LexErrorKind::UnexpectedChar => "unexpected character",
            LexErrorKind::UnterminatedString => "unterminated string literal",
            LexErrorKind::UnterminatedBlockComment => "unterminated block comment",
            LexErrorKind::InvalidSuffix => "invalid literal suffix",
            LexErrorKind::InvalidDigit => "invalid digit in numeric literal",
        };
        f.write_str(text)
    }
}

/// Syntax error
#[derive(Error, Debug, miette::Diagnostic, Clone)]
pub enum ParseError {
    #[error("{kind}: {detail}")]
    #[diagnostic(code(syntax::lex))]
    Lex {
        kind: LexErrorKind,
        detail: String,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(syntax::unexpected_token))]
    UnexpectedToken {
        expected: String,
        found: String,
        #[label("unexpected {found}")]
        span: SourceSpan,
    },

    #[error("ambiguous {construct}")]
    #[diagnostic(code(syntax::ambiguous))]
    AmbiguousConstruct {
        construct: String,
        #[label("cannot be read unambiguously")]
        span: SourceSpan,
        #[help]
        help: Option<String>,
    },

    #[error("unterminated {construct}")]
    #[diagnostic(code(syntax::unterminated))]
    UnterminatedConstruct {
        construct: String,
        #[label("opened here")]
        open: SourceSpan,
        #[label("input ends here")]
        span: SourceSpan,
    },

    #[error("nesting exceeds the recursion limit of {limit}")]
    #[diagnostic(code(syntax::recursion_limit))]
    RecursionLimit {
        limit: usize,
        #[label("nested too deeply")]
        span: SourceSpan,
    },

    #[error("{message}")]
    #[diagnostic(code(syntax::misplaced))]
    Misplaced {
        message: String,
        #[label("here")]
        span: SourceSpan,
        #[help]
        help: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(code(syntax::lint), severity(Warning))]
    Lint {
        message: String,
        #[label("here")]
        span: SourceSpan,
    },
}

/// Coarse classification of a [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lex(LexErrorKind),
    UnexpectedToken,
    AmbiguousConstruct,
    UnterminatedConstruct,
    RecursionLimit,
    Misplaced,
    Lint,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Lex { kind, .. } => ErrorKind::Lex(*kind),
            ParseError::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            ParseError::AmbiguousConstruct { .. } => ErrorKind::AmbiguousConstruct,
            ParseError::UnterminatedConstruct { .. } => ErrorKind::UnterminatedConstruct,
            ParseError::RecursionLimit { .. } => ErrorKind::RecursionLimit,
            ParseError::Misplaced { .. } => ErrorKind::Misplaced,
            ParseError::Lint { .. } => ErrorKind::Lint,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ParseError::Lint { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// One recorded problem
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub span: Span,
    pub severity: Severity,
    pub error: ParseError,
}

impl Diagnostic {
    pub fn new(span: Span, error: ParseError) -> Self {
        Self {
            span,
            severity: error.severity(),
            error,
        }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Attach the source text so miette can render labels
    pub fn to_report(&self, file: &SourceFile) -> miette::Report {
        miette::Report::new(self.error.clone()).with_source_code(file.to_named_source())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.span, self.error)
    }
}

/// Proof that an error diagnostic has been recorded
///
/// Parse functions return `Result<T, ErrorGuaranteed>`, so a failure can only
/// be produced after something was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    /// For failures whose diagnostic was recorded earlier, e.g. by the lexer
    pub(crate) fn already_reported() -> Self {
        ErrorGuaranteed(())
    }
}

/// Append-only diagnostic sink
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.records.push(diagnostic);
    }

    /// Record an error and hand back the proof
    pub fn error(&mut self, span: Span, error: ParseError) -> ErrorGuaranteed {
        tracing::debug!(%span, %error, "syntax error");
        self.push(Diagnostic::new(span, error));
        ErrorGuaranteed(())
    }

    pub fn warn(&mut self, span: Span, error: ParseError) {
        self.push(Diagnostic::new(span, error));
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        self.records.extend(other);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.records.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.records.iter().filter(|d| d.is_error()).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.records
    }

    /// Drop records made after a speculation snapshot
    pub(crate) fn truncate(&mut self, len: usize) {
        self.records.truncate(len);
    }

    /// Render every record against its source text
    pub fn render(&self, file: &SourceFile) -> String {
        self.records
            .iter()
            .map(|d| format!("{:?}", d.to_report(file)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Print all diagnostics
    pub fn emit_all(&self, file: &SourceFile) {
        for diagnostic in &self.records {
            eprintln!("{:?}", diagnostic.to_report(file));
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sourcemap::FileId;

    #[test]
    fn lint_is_a_warning() {
        let mut sink = Diagnostics::new();
        sink.warn(
            Span::new(0, 1),
            ParseError::Lint {
                message: "unnecessary parentheses".into(),
                span: Span::new(0, 1).into(),
            },
        );
        assert_eq!(sink.len(), 1);
        assert!(!sink.has_errors());
    }

    #[test]
    fn renders_against_source() {
        let file = SourceFile::new(FileId(0), "t.jc", "let = 1;");
        let mut sink = Diagnostics::new();
        sink.error(
            Span::new(4, 5),
            ParseError::UnexpectedToken {
                expected: "pattern".into(),
                found: "`=`".into(),
                span: Span::new(4, 5).into(),
            },
        );
        assert!(!sink.render(&file).is_empty());
        assert_eq!(sink.as_slice()[0].message(), "expected pattern, found `=`");
        assert_eq!(sink.error_count(), 1);
    }
}
