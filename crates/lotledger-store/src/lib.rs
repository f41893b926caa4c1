//! # lotledger Store
//!
//! Storage abstraction for the stock ledger. Provides a trait-based interface
//! for the stock table and the ledger log with SQLite and in-memory
//! implementations.
//!
//! ## Overview
//!
//! The store module abstracts persistence behind the [`Store`] trait,
//! allowing the ledger service to be storage-agnostic. The primary
//! implementation is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`Store`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`Committed`] - The record and ledger entry produced by one unit of work
//! - [`Movement`] - An inbound or outbound quantity change
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lotledger_core::ItemKey;
//! use lotledger_store::{SqliteStore, Store};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("ledger.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     let committed = store
//!         .register(&ItemKey::new("A001", "Widget", "LOT1"))
//!         .await
//!         .unwrap();
//!     assert_eq!(committed.record.quantity, 0);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Units of work**: register, remove and movements change the stock
//!   table and append to the log in one transaction
//! - **Append-only log**: enforced with triggers in the SQLite schema
//! - **Case-sensitive search**: substring matching never folds case

pub mod error;
pub mod ledger_log;
pub mod memory;
pub mod migration;
pub mod records;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::{SqliteConfig, SqliteStore};
pub use traits::{Committed, Movement, Store, StoreExt};
