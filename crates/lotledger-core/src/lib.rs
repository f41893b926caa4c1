//! # lotledger Core
//!
//! Pure data model for the inventory ledger: stock records, ledger entries,
//! and validation of caller input.
//!
//! This crate contains no I/O and no storage.
//!
//! ## Key Types
//!
//! - [`StockRecord`] - Current on-hand quantity of one (item code, lot) pair
//! - [`LedgerEntry`] - Immutable audit record of one mutation
//! - [`Action`] - REGISTER, INBOUND, OUTBOUND or DELETE
//! - [`Direction`] - Inbound or outbound movement
//! - [`StockQuery`] - Exact-match query over the identifying fields

pub mod clock;
pub mod entry;
pub mod error;
pub mod record;
pub mod types;
pub mod validation;

pub use clock::now_millis;
pub use entry::{sort_newest_first, Action, Direction, LedgerEntry, PendingEntry};
pub use error::ValidationError;
pub use record::{ItemKey, LotKey, StockQuery, StockRecord};
pub use types::{EntryId, StockId};
pub use validation::{
    parse_amount, validate_amount, validate_item_key, MAX_ITEM_CODE_LEN,
    MAX_ITEM_NAME_LEN, MAX_LOT_NUMBER_LEN,
};
