//! Error types for the store module.

use lotledger_core::StockId;
use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Any error returned from a unit of work means nothing was committed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A record with this (item_code, lot_number) already exists.
    #[error("stock record already exists: item_code={item_code} lot_number={lot_number}")]
    DuplicateKey {
        item_code: String,
        lot_number: String,
    },

    /// Referenced record is absent.
    #[error("stock record not found: {0}")]
    NotFound(String),

    /// Outbound movement would drive the quantity below zero.
    #[error("insufficient stock for {stock_id}: available {available}, requested {requested}")]
    InsufficientStock {
        stock_id: StockId,
        available: i64,
        requested: i64,
    },

    /// The resulting quantity does not fit in an i64.
    #[error("quantity overflow on stock record {0}")]
    QuantityOverflow(StockId),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// A thread panicked while holding the connection lock.
    #[error("connection lock poisoned: {0}")]
    Poisoned(String),

    /// The blocking task running a query failed to complete.
    #[error("blocking task failed: {0}")]
    Task(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
