//! Error types for the Ledger.

use lotledger_core::{StockId, ValidationError};
use lotledger_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Ledger operations.
///
/// Every error means the operation committed nothing.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A record with this (item_code, lot_number) already exists.
    #[error("stock record already exists: item_code={item_code} lot_number={lot_number}")]
    DuplicateKey {
        item_code: String,
        lot_number: String,
    },

    /// Referenced record or key is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Movement amount is not a positive integer.
    #[error("amount must be a positive integer, got {0:?}")]
    InvalidAmount(String),

    /// A lookup key matched more than one record under `RejectAmbiguous`.
    #[error("{field}={value} matches {count} stock records")]
    AmbiguousMatch {
        field: &'static str,
        value: String,
        count: usize,
    },

    /// Outbound movement refused by `RejectNegative`.
    #[error("insufficient stock for {stock_id}: available {available}, requested {requested}")]
    InsufficientStock {
        stock_id: StockId,
        available: i64,
        requested: i64,
    },

    /// The resulting quantity does not fit in an i64.
    #[error("quantity overflow on stock record {0}")]
    QuantityOverflow(StockId),

    /// Field validation error.
    #[error("validation error: {0}")]
    Validation(ValidationError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<ValidationError> for LedgerError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::InvalidAmount(text) => LedgerError::InvalidAmount(text),
            other => LedgerError::Validation(other),
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey {
                item_code,
                lot_number,
            } => LedgerError::DuplicateKey {
                item_code,
                lot_number,
            },
            StoreError::NotFound(what) => LedgerError::NotFound(what),
            StoreError::InsufficientStock {
                stock_id,
                available,
                requested,
            } => LedgerError::InsufficientStock {
                stock_id,
                available,
                requested,
            },
            StoreError::QuantityOverflow(id) => LedgerError::QuantityOverflow(id),
            other => LedgerError::Store(other),
        }
    }
}

/// Result type for Ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
