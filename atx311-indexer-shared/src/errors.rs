//! Errors raised while converting source values into document fields.

use thiserror::Error;

/// Errors that can occur while hydrating or inspecting a document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// A value in an integer column could not be parsed.
    #[error("Invalid integer in column {column:?}: {value:?}")]
    InvalidInteger { column: String, value: String },

    /// A value in a float column could not be parsed.
    #[error("Invalid float in column {column:?}: {value:?}")]
    InvalidFloat { column: String, value: String },

    /// The document carries no timestamp value.
    #[error("Document has no timestamp")]
    MissingTimestamp,

    /// The timestamp does not match the expected date-time format.
    #[error("Invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },
}

impl DocumentError {
    /// Create an invalid integer error.
    pub fn invalid_integer(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidInteger {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Create an invalid float error.
    pub fn invalid_float(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidFloat {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Create an invalid timestamp error.
    pub fn invalid_timestamp(value: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
