//! The Ledger: the service API of the stock ledger.
//!
//! The Ledger validates caller input, turns each request into exactly one
//! unit of work on the store, and serves lookups and searches. Handlers may
//! share one Ledger across tasks; it holds no state besides the store handle
//! and its configuration.

use std::sync::Arc;

use lotledger_core::{
    validate_amount, validate_item_key, Direction, ItemKey, LedgerEntry, LotKey,
    StockId, StockRecord,
};
use lotledger_store::{Movement, Store};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::lookup::{CodeAndLot, CodeAndName, LookupIndex, NameAndLot};

/// The main Ledger struct.
///
/// Provides a unified API for:
/// - Registering and removing stock records
/// - Inbound and outbound movements
/// - Lookups by item code, item name or lot number
/// - Listing current stock and the mutation history
pub struct Ledger<S: Store> {
    /// The storage backend.
    store: Arc<S>,
    /// Configuration.
    config: LedgerConfig,
}

impl<S: Store> Clone for Ledger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: Store> Ledger<S> {
    /// Create a ledger over `store`.
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self::from_shared(Arc::new(store), config)
    }

    /// Create a ledger over a store handle shared with other components.
    pub fn from_shared(store: Arc<S>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The lookup view over the current stock table.
    pub fn lookup(&self) -> LookupIndex<'_, S> {
        LookupIndex::new(self.store.as_ref(), self.config.lookup)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a new record with quantity 0 and log a REGISTER entry.
    pub async fn register(
        &self,
        item_code: &str,
        item_name: &str,
        lot_number: &str,
    ) -> Result<StockRecord> {
        let key = ItemKey::new(item_code, item_name, lot_number);
        validate_item_key(&key).map_err(|e| rejected("register", e))?;

        let committed = self.store.register(&key).await?;
        tracing::debug!(
            stock_id = %committed.record.id,
            item_code = %committed.record.item_code,
            lot_number = %committed.record.lot_number,
            "registered stock record"
        );
        Ok(committed.record)
    }

    /// Delete the record for (item_code, lot_number) and log a DELETE entry
    /// carrying the quantity on hand.
    ///
    /// The key is not field-validated: a blank or overlong key can never have
    /// been registered, so it fails with `NotFound` like any other absent key.
    pub async fn remove(&self, item_code: &str, lot_number: &str) -> Result<StockRecord> {
        let key = LotKey::new(item_code, lot_number);

        let committed = self.store.remove(&key).await?;
        tracing::debug!(
            stock_id = %committed.record.id,
            item_code = %committed.record.item_code,
            lot_number = %committed.record.lot_number,
            quantity = committed.record.quantity,
            "removed stock record"
        );
        Ok(committed.record)
    }

    /// Move `amount` units in or out of a record and log the signed delta.
    ///
    /// `amount` must be positive. Under `RejectNegative`, an outbound move
    /// that would leave a negative quantity fails with `InsufficientStock`.
    pub async fn move_stock(
        &self,
        stock_id: StockId,
        amount: i64,
        direction: Direction,
    ) -> Result<StockRecord> {
        let amount = validate_amount(amount).map_err(|e| rejected("move", e))?;

        let movement = Movement {
            stock_id,
            amount,
            direction,
            allow_negative: self.config.outbound.allows_negative(),
        };

        let committed = match self.store.apply_movement(&movement).await {
            Ok(committed) => committed,
            Err(e) => {
                let e = LedgerError::from(e);
                if let LedgerError::InsufficientStock { available, .. } = &e {
                    tracing::warn!(%stock_id, available, amount, "outbound movement refused");
                }
                return Err(e);
            }
        };

        tracing::debug!(
            %stock_id,
            action = %committed.entry.action,
            delta = committed.entry.quantity,
            quantity = committed.record.quantity,
            "moved stock"
        );
        Ok(committed.record)
    }

    /// Shorthand for an inbound [`move_stock`](Self::move_stock).
    pub async fn receive(&self, stock_id: StockId, amount: i64) -> Result<StockRecord> {
        self.move_stock(stock_id, amount, Direction::Inbound).await
    }

    /// Shorthand for an outbound [`move_stock`](Self::move_stock).
    pub async fn issue(&self, stock_id: StockId, amount: i64) -> Result<StockRecord> {
        self.move_stock(stock_id, amount, Direction::Outbound).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a record by id.
    pub async fn get_stock(&self, stock_id: StockId) -> Result<StockRecord> {
        self.store
            .get_stock(stock_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("id={}", stock_id)))
    }

    pub async fn lookup_by_code(&self, item_code: &str) -> Result<NameAndLot> {
        self.lookup().by_code(item_code).await
    }

    pub async fn lookup_by_name(&self, item_name: &str) -> Result<CodeAndLot> {
        self.lookup().by_name(item_name).await
    }

    pub async fn lookup_by_lot(&self, lot_number: &str) -> Result<CodeAndName> {
        self.lookup().by_lot(lot_number).await
    }

    /// Current records containing `search` in any identifying field, in
    /// table order. An empty search lists everything.
    pub async fn list_stock(&self, search: &str) -> Result<Vec<StockRecord>> {
        Ok(self.store.search_stock(search).await?)
    }

    /// Ledger entries containing `search` in any snapshot field, newest first.
    pub async fn list_history(&self, search: &str) -> Result<Vec<LedgerEntry>> {
        Ok(self.store.list_entries(search).await?)
    }
}

fn rejected(op: &'static str, e: lotledger_core::ValidationError) -> LedgerError {
    tracing::warn!(op, error = %e, "request rejected");
    LedgerError::from(e)
}
