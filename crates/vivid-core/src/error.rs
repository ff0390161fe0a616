//! Error types for parsing, mutation and construction.

use thiserror::Error;

/// Errors surfaced by vivid-core.
///
/// Scalar coercions never produce an error; they fall back to a default instead.
#[derive(Error, Debug)]
pub enum JsonError {
    /// The input text was not a valid JSON document.
    /// Line and column are 1-based and point at the first offending token.
    #[error("JSON parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    /// Illegal structural mutation or an unsupported native value.
    #[error("usage error: {0}")]
    Usage(String),

    /// Opening or reading the underlying resource failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl JsonError {
    pub(crate) fn parse(message: impl Into<String>, line: usize, column: usize) -> Self {
        JsonError::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    pub(crate) fn usage(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::debug!(%message, "usage fault");
        JsonError::Usage(message)
    }

    /// `(line, column)` of a parse failure.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            JsonError::Parse { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, JsonError::Parse { .. })
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, JsonError::Usage(_))
    }
}

/// Convenience alias used throughout vivid-core.
pub type Result<T> = std::result::Result<T, JsonError>;
