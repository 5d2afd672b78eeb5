//! Parser-internal failure type.

use merrow_core::error::ParseError;
use thiserror::Error;

use crate::tokens::Token;

/// A local parse failure raised inside a statement production.
///
/// Carries the location of the token that was active when the failure was
/// raised; the statement driver converts it into a [`ParseError`] record
/// on the owning diagram before resynchronizing.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub(crate) struct SyntaxError {
    pub(crate) message: String,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl SyntaxError {
    pub(crate) fn at(token: &Token<'_>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: token.line,
            column: token.column,
        }
    }

    pub(crate) fn into_parse_error(self) -> ParseError {
        ParseError::new(self.message, self.line, self.column)
    }
}

pub(crate) type Result<T> = std::result::Result<T, SyntaxError>;
