//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::PathBuf;

use lotledger::store::{MemoryStore, SqliteStore, Store};
use lotledger::{Ledger, LedgerConfig, StockRecord};
use tempfile::TempDir;

/// A ledger plus whatever must outlive it (the temp dir of a file store).
pub struct TestFixture<S: Store> {
    pub ledger: Ledger<S>,
    dir: Option<TempDir>,
}

impl TestFixture<MemoryStore> {
    /// Ledger over a fresh in-memory store.
    pub fn memory(config: LedgerConfig) -> Self {
        Self {
            ledger: Ledger::new(MemoryStore::new(), config),
            dir: None,
        }
    }
}

impl TestFixture<SqliteStore> {
    /// Ledger over an in-memory SQLite database.
    pub fn sqlite_memory(config: LedgerConfig) -> Self {
        let store = SqliteStore::open_memory().expect("open in-memory sqlite");
        Self {
            ledger: Ledger::new(store, config),
            dir: None,
        }
    }

    /// Ledger over a SQLite file in a fresh temp dir, with WAL enabled.
    pub fn sqlite_file(config: LedgerConfig) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = SqliteStore::open(dir.path().join("ledger.db")).expect("open sqlite file");
        Self {
            ledger: Ledger::new(store, config),
            dir: Some(dir),
        }
    }
}

impl<S: Store> TestFixture<S> {
    /// Path of the database file, for file-backed fixtures.
    pub fn db_path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.path().join("ledger.db"))
    }

    /// Register the sample items used across suites.
    pub async fn seed(&self) -> Vec<StockRecord> {
        let mut records = Vec::new();
        for (code, name, lot) in sample_items() {
            records.push(
                self.ledger
                    .register(code, name, lot)
                    .await
                    .expect("register sample item"),
            );
        }
        records
    }
}

/// Sample items, two lots sharing one item code.
pub fn sample_items() -> [(&'static str, &'static str, &'static str); 4] {
    [
        ("A001", "テスト商品A", "LOT1"),
        ("A001", "テスト商品A", "LOT2"),
        ("B002", "テスト商品B", "LOT3"),
        ("C003", "Widget", "W-100"),
    ]
}

/// Install a test-writer tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
