//! Parse diagnostics owned by diagram models.
//!
//! Parsing never fails outright: every local failure is converted into a
//! [`ParseError`] appended to the owning diagram's error list, and the
//! parser resynchronizes at the next statement boundary. A diagram with a
//! non-empty error list is still a usable, partially populated model.

use serde::Serialize;
use thiserror::Error;

/// A single diagnostic produced while parsing diagram source.
///
/// Locations are 1-based and refer to the token that was active when the
/// failure was raised. Records are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message} (line {line}, column {column})")]
pub struct ParseError {
    /// Human-readable description of what went wrong.
    pub message: String,
    /// 1-based source line.
    pub line: usize,
    /// 1-based source column.
    pub column: usize,
}

impl ParseError {
    /// Creates a diagnostic at the given source location.
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("expected ']'", 3, 7);
        assert_eq!(err.to_string(), "expected ']' (line 3, column 7)");
    }

    #[test]
    fn test_parse_error_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        let err = ParseError::new("missing 'end'", 1, 1);
        takes_error(&err);
    }
}
