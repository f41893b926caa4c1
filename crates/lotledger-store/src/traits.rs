//! Store trait: the abstract interface for ledger persistence.
//!
//! Each mutating method is one unit of work: the stock table change and its
//! ledger entry commit together or not at all. Implementations include
//! SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use lotledger_core::{
    Direction, ItemKey, LedgerEntry, LotKey, StockId, StockQuery, StockRecord,
};

use crate::error::Result;

/// Outcome of a committed unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    /// The record after the mutation (or just before removal, for deletes).
    pub record: StockRecord,
    /// The ledger entry appended alongside it.
    pub entry: LedgerEntry,
}

/// A quantity movement against one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    pub stock_id: StockId,
    /// Positive number of units to move.
    pub amount: i64,
    pub direction: Direction,
    /// Whether an outbound movement may leave the quantity below zero.
    pub allow_negative: bool,
}

impl Movement {
    /// Signed delta this movement applies.
    pub fn delta(&self) -> i64 {
        self.direction.signed(self.amount)
    }
}

/// The Store trait: async interface for ledger persistence.
///
/// All methods are async so blocking backends can move work off the runtime.
/// For SQLite, `spawn_blocking` is used internally.
///
/// # Design Notes
///
/// - **Uniqueness**: at most one record per (item_code, lot_number).
/// - **Append-only log**: entries are never updated or deleted.
/// - **No lost updates**: concurrent movements on one record serialize.
/// - **Ordering**: stock reads return table order (ascending id); the log is
///   returned newest first, ties broken by reverse insertion order.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // Units of Work
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a record with quantity 0 and append a REGISTER entry.
    ///
    /// Fails with `DuplicateKey` if the (item_code, lot_number) pair exists.
    async fn register(&self, key: &ItemKey) -> Result<Committed>;

    /// Delete the record for `key` and append a DELETE entry carrying the
    /// quantity on hand at deletion time.
    ///
    /// Fails with `NotFound` if no record matches.
    async fn remove(&self, key: &LotKey) -> Result<Committed>;

    /// Apply a movement and append an INBOUND or OUTBOUND entry carrying the
    /// signed delta.
    ///
    /// Fails with `NotFound` if the id is absent, `InsufficientStock` if the
    /// movement is outbound, negatives are not allowed and the quantity would
    /// drop below zero.
    async fn apply_movement(&self, movement: &Movement) -> Result<Committed>;

    // ─────────────────────────────────────────────────────────────────────────
    // Record Store Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a record by its surrogate id.
    async fn get_stock(&self, id: StockId) -> Result<Option<StockRecord>>;

    /// All records matching every supplied field of `query`, in table order.
    async fn find_all(&self, query: &StockQuery) -> Result<Vec<StockRecord>>;

    /// Records whose item_code, item_name or lot_number contains `needle`,
    /// case-sensitive, in table order. An empty needle returns every record.
    async fn search_stock(&self, needle: &str) -> Result<Vec<StockRecord>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Ledger Log Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Entries whose snapshot fields contain `needle`, newest first.
    async fn list_entries(&self, needle: &str) -> Result<Vec<LedgerEntry>>;
}

/// Extension trait for common store patterns.
pub trait StoreExt: Store {
    /// First record matching `query` by insertion order.
    fn find_by(
        &self,
        query: &StockQuery,
    ) -> impl std::future::Future<Output = Result<Option<StockRecord>>> + Send;
}

impl<S: Store + ?Sized> StoreExt for S {
    async fn find_by(&self, query: &StockQuery) -> Result<Option<StockRecord>> {
        Ok(self.find_all(query).await?.into_iter().next())
    }
}
