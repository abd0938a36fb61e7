//! Lexer and parser configuration
//!
//! Configuration normally lives in the `[syntax]` table of a project manifest:
//!
//! ```toml
//! [syntax]
//! elide-semicolons = true
//! recursion-limit = 256
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default nesting depth before the parser gives up on a construct
pub const DEFAULT_RECURSION_LIMIT: usize = 128;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid syntax configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("recursion limit must be at least 1")]
    ZeroRecursionLimit,
}

/// Lexer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LexConfig {
    /// Emit `Newline` soft separators instead of discarding line breaks
    pub retain_newlines: bool,
}

/// Parser settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParseConfig {
    /// Accept a line break wherever a statement-terminating `;` is expected
    pub elide_semicolons: bool,
    /// Warn about parentheses around `if`/`while`/`match` heads
    pub lint_parens: bool,
    pub recursion_limit: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            elide_semicolons: false,
            lint_parens: true,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

#[derive(Deserialize)]
struct Manifest {
    #[serde(default)]
    syntax: ParseConfig,
}

impl ParseConfig {
    /// Read the `[syntax]` table of a manifest; a missing table gives defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let manifest: Manifest = toml::from_str(text)?;
        manifest.syntax.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.recursion_limit == 0 {
            return Err(ConfigError::ZeroRecursionLimit);
        }
        Ok(self)
    }

    /// Lexer settings implied by these parser settings
    pub fn lex_config(&self) -> LexConfig {
        LexConfig {
            retain_newlines: self.elide_semicolons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_uses_defaults() {
        let config = ParseConfig::from_toml_str("[package]\nname = \"x\"\n").unwrap();
        assert_eq!(config, ParseConfig::default());
    }

    #[test]
    fn reads_syntax_table() {
        let config =
            ParseConfig::from_toml_str("[syntax]\nelide-semicolons = true\nrecursion-limit = 16\n")
                .unwrap();
        assert!(config.elide_semicolons);
        assert!(config.lint_parens);
        assert_eq!(config.recursion_limit, 16);
        assert!(config.lex_config().retain_newlines);
    }

    #[test]
    fn rejects_zero_limit() {
        let err = ParseConfig::from_toml_str("[syntax]\nrecursion-limit = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroRecursionLimit));
    }

    #[test]
    fn rejects_bad_types() {
        let err = ParseConfig::from_toml_str("[syntax]\nlint-parens = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
