//! Error types for the ledger core.

use thiserror::Error;

/// Validation errors for caller-supplied fields and amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    BlankField { field: &'static str },

    #[error("{field} exceeds {max} characters (got {len})")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("amount must be a positive integer, got {0:?}")]
    InvalidAmount(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),
}
