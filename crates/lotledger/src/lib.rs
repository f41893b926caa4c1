//! # lotledger
//!
//! An inventory ledger: stock levels per (item code, lot number), inbound
//! and outbound movements, and an immutable audit log of every change.
//!
//! ## Overview
//!
//! - **Stock records**: current on-hand quantity, unique per (item_code, lot_number)
//! - **Ledger entries**: append-only snapshots of every registration,
//!   movement and deletion
//! - **Lookups**: resolve one identifying field to the other two
//! - **Search**: case-sensitive substring search over stock and history
//!
//! Every mutation is a single unit of work: the stock change and its ledger
//! entry commit together, or neither does.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lotledger::{Direction, Ledger, LedgerConfig};
//! use lotledger::store::SqliteStore;
//!
//! async fn example() -> lotledger::Result<()> {
//!     let store = SqliteStore::open("ledger.db")?;
//!     let ledger = Ledger::new(store, LedgerConfig::default());
//!
//!     let widget = ledger.register("A001", "Widget", "LOT1").await?;
//!     ledger.move_stock(widget.id, 10, Direction::Inbound).await?;
//!     ledger.move_stock(widget.id, 4, Direction::Outbound).await?;
//!
//!     let found = ledger.lookup_by_lot("LOT1").await?;
//!     assert_eq!(found.item_code, "A001");
//!
//!     for entry in ledger.list_history("").await? {
//!         println!("{} {} {}", entry.action, entry.item_code, entry.quantity);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `lotledger::core` - Data model and validation
//! - `lotledger::store` - Storage abstraction and SQLite

pub mod config;
pub mod error;
pub mod ledger;
pub mod lookup;

// Re-export component crates
pub use lotledger_core as core;
pub use lotledger_store as store;

// Re-export main types for convenience
pub use config::{LedgerConfig, LookupPolicy, OutboundPolicy};
pub use error::{LedgerError, Result};
pub use ledger::Ledger;
pub use lookup::{CodeAndLot, CodeAndName, LookupIndex, NameAndLot};

// Re-export commonly used core types
pub use lotledger_core::{
    parse_amount, Action, Direction, EntryId, ItemKey, LedgerEntry, LotKey, StockId, StockRecord,
};
