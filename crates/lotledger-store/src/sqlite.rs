//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via tokio::spawn_blocking.
//!
//! Every unit of work runs in a `BEGIN IMMEDIATE` transaction on the writer
//! connection, so the read-modify-write of a movement holds the database
//! write lock from its first read. File-backed stores also keep a separate
//! reader connection in WAL mode; reads see the latest committed state and
//! never queue behind a writer.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lotledger_core::{
    now_millis, Action, ItemKey, LedgerEntry, LotKey, PendingEntry, StockId, StockQuery,
    StockRecord,
};
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::traits::{Committed, Movement, Store};
use crate::{ledger_log, migration, records};

/// Connection settings for a file-backed [`SqliteStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// How long a connection waits on a locked database before failing.
    pub busy_timeout_ms: u64,
    /// Enable write-ahead logging.
    pub wal: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            wal: true,
        }
    }
}

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutexes. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// Connection used for every unit of work.
    writer: Arc<Mutex<Connection>>,
    /// Connection used for reads. Same as `writer` for in-memory databases.
    reader: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path with default settings.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &SqliteConfig::default())
    }

    /// Open a SQLite database at the given path.
    pub fn open_with(path: impl AsRef<Path>, config: &SqliteConfig) -> Result<Self> {
        let path = path.as_ref();

        let mut writer = Connection::open(path)?;
        configure(&writer, config)?;
        migration::migrate(&mut writer)?;

        let reader = Connection::open(path)?;
        configure(&reader, config)?;

        tracing::info!(
            path = %path.display(),
            schema_version = migration::CURRENT_VERSION,
            wal = config.wal,
            "opened stock ledger database"
        );

        Ok(Self {
            writer: Arc::new(Mutex::new(writer)),
            reader: Arc::new(Mutex::new(reader)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing. Reads and writes share one connection.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self {
            writer: Arc::clone(&conn),
            reader: conn,
        })
    }

    /// Run a unit of work inside an immediate transaction on the writer.
    ///
    /// Returning an error from `f` drops the transaction, rolling back
    /// everything it did.
    async fn write<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(&self.writer, move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
        .await
    }

    /// Run a read-only query on the reader.
    async fn read<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(&self.reader, move |conn| f(conn)).await
    }
}

fn configure(conn: &Connection, config: &SqliteConfig) -> Result<()> {
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    if config.wal {
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        if !mode.eq_ignore_ascii_case("wal") {
            tracing::warn!(journal_mode = %mode, "WAL mode unavailable");
        }
    }
    Ok(())
}

/// Execute a blocking operation on a connection off the async runtime.
async fn run_blocking<F, T>(conn: &Arc<Mutex<Connection>>, f: F) -> Result<T>
where
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let conn = Arc::clone(conn);

    tokio::task::spawn_blocking(move || {
        let mut conn = conn
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        f(&mut conn)
    })
    .await
    .map_err(|e| StoreError::Task(e.to_string()))?
}

#[async_trait]
impl Store for SqliteStore {
    async fn register(&self, key: &ItemKey) -> Result<Committed> {
        let key = key.clone();

        self.write(move |tx| {
            let record = records::create(tx, &key)?;
            let entry = ledger_log::append(
                tx,
                PendingEntry::for_record(&record, Action::Register, 0),
                now_millis(),
            )?;
            Ok(Committed { record, entry })
        })
        .await
    }

    async fn remove(&self, key: &LotKey) -> Result<Committed> {
        let key = key.clone();

        self.write(move |tx| {
            let record = records::delete(tx, &key)?;
            let entry = ledger_log::append(
                tx,
                PendingEntry::for_record(&record, Action::Delete, record.quantity),
                now_millis(),
            )?;
            Ok(Committed { record, entry })
        })
        .await
    }

    async fn apply_movement(&self, movement: &Movement) -> Result<Committed> {
        let movement = *movement;

        self.write(move |tx| {
            let delta = movement.delta();
            let record =
                records::adjust(tx, movement.stock_id, delta, movement.allow_negative)?;
            let entry = ledger_log::append(
                tx,
                PendingEntry::for_record(&record, movement.direction.action(), delta),
                now_millis(),
            )?;
            Ok(Committed { record, entry })
        })
        .await
    }

    async fn get_stock(&self, id: StockId) -> Result<Option<StockRecord>> {
        self.read(move |conn| records::get(conn, id)).await
    }

    async fn find_all(&self, query: &StockQuery) -> Result<Vec<StockRecord>> {
        let query = query.clone();
        self.read(move |conn| records::find_all(conn, &query)).await
    }

    async fn search_stock(&self, needle: &str) -> Result<Vec<StockRecord>> {
        let needle = needle.to_string();
        self.read(move |conn| records::search(conn, &needle)).await
    }

    async fn list_entries(&self, needle: &str) -> Result<Vec<LedgerEntry>> {
        let needle = needle.to_string();
        self.read(move |conn| ledger_log::list(conn, &needle)).await
    }
}
