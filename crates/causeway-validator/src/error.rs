//! Validator error types

use causeway_domain::{column_label, QuestionId};
use thiserror::Error;

/// Errors that can occur during validation and cause management
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// Question or cause does not exist (or is not reachable by the caller)
    #[error("Not found: {0}")]
    NotFound(String),

    /// The oracle could not be reached or returned an unusable payload
    #[error("AI service unavailable: {0}")]
    AiServiceUnavailable(String),

    /// A frontier cause has no cause directly above it in its column
    #[error("Broken chain: cause {} has no parent cause {}", position(*column, *row), position(*column, row.saturating_sub(1)))]
    BrokenChain {
        /// Column of the orphaned cause
        column: u32,
        /// Row of the orphaned cause
        row: u32,
    },

    /// Caller is not allowed to perform the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Cause column is beyond the configured maximum
    #[error("Column {column} exceeds the maximum of {max} columns")]
    ColumnLimitExceeded {
        /// Requested column (0-based)
        column: u32,
        /// Configured number of columns
        max: u32,
    },

    /// Rejected input (empty text, row 0, occupied position)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Another sweep is running for the same question
    #[error("A validation sweep is already running for question {0}")]
    SweepInProgress(QuestionId),

    /// Store error
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ValidatorError {
    pub(crate) fn store(e: impl std::fmt::Display) -> Self {
        ValidatorError::Store(e.to_string())
    }
}

/// Render a diagram position such as `B3`
pub(crate) fn position(column: u32, row: u32) -> String {
    match column_label(column) {
        Some(label) => format!("{}{}", label, row),
        None => format!("#{}:{}", column, row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broken_chain_message() {
        let err = ValidatorError::BrokenChain { column: 1, row: 3 };
        assert_eq!(err.to_string(), "Broken chain: cause B3 has no parent cause B2");
    }

    #[test]
    fn test_position_past_alphabet() {
        assert_eq!(position(0, 1), "A1");
        assert_eq!(position(30, 2), "#30:2");
    }
}
