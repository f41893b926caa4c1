//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use lotledger_core::{
    now_millis, sort_newest_first, Action, EntryId, ItemKey, LedgerEntry, LotKey, PendingEntry,
    StockId, StockQuery, StockRecord,
};

use crate::error::{Result, StoreError};
use crate::traits::{Committed, Movement, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; each
/// unit of work holds the write guard from its first check to its last
/// mutation, and validates everything before mutating anything.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Records by id. Ids only grow, so iteration order is table order.
    records: BTreeMap<StockId, StockRecord>,

    /// Uniqueness index: (item_code, lot_number) -> id.
    lots: HashMap<LotKey, StockId>,

    /// The log, in insertion order.
    entries: Vec<LedgerEntry>,

    last_stock_id: i64,
    last_entry_id: i64,
}

impl MemoryStoreInner {
    fn append(&mut self, pending: PendingEntry) -> LedgerEntry {
        self.last_entry_id += 1;
        let entry = pending.commit(EntryId(self.last_entry_id), now_millis());
        self.entries.push(entry.clone());
        entry
    }
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn register(&self, key: &ItemKey) -> Result<Committed> {
        let mut inner = self.write()?;

        let lot_key = key.lot_key();
        if inner.lots.contains_key(&lot_key) {
            return Err(StoreError::DuplicateKey {
                item_code: key.item_code.clone(),
                lot_number: key.lot_number.clone(),
            });
        }

        inner.last_stock_id += 1;
        let record = StockRecord {
            id: StockId(inner.last_stock_id),
            item_code: key.item_code.clone(),
            item_name: key.item_name.clone(),
            lot_number: key.lot_number.clone(),
            quantity: 0,
        };
        inner.records.insert(record.id, record.clone());
        inner.lots.insert(lot_key, record.id);

        let entry = inner.append(PendingEntry::for_record(&record, Action::Register, 0));
        Ok(Committed { record, entry })
    }

    async fn remove(&self, key: &LotKey) -> Result<Committed> {
        let mut inner = self.write()?;

        let id = *inner.lots.get(key).ok_or_else(|| {
            StoreError::NotFound(format!(
                "item_code={} lot_number={}",
                key.item_code, key.lot_number
            ))
        })?;
        let record = inner
            .records
            .remove(&id)
            .ok_or_else(|| StoreError::InvalidData(format!("lot index points at missing id {}", id)))?;
        inner.lots.remove(key);

        let entry =
            inner.append(PendingEntry::for_record(&record, Action::Delete, record.quantity));
        Ok(Committed { record, entry })
    }

    async fn apply_movement(&self, movement: &Movement) -> Result<Committed> {
        let mut inner = self.write()?;

        let id = movement.stock_id;
        let delta = movement.delta();

        let current = inner
            .records
            .get(&id)
            .map(|r| r.quantity)
            .ok_or_else(|| StoreError::NotFound(format!("id={}", id)))?;
        let quantity = current
            .checked_add(delta)
            .ok_or(StoreError::QuantityOverflow(id))?;
        if quantity < 0 && !movement.allow_negative {
            return Err(StoreError::InsufficientStock {
                stock_id: id,
                available: current,
                requested: delta.saturating_abs(),
            });
        }

        let record = match inner.records.get_mut(&id) {
            Some(record) => {
                record.quantity = quantity;
                record.clone()
            }
            None => return Err(StoreError::NotFound(format!("id={}", id))),
        };

        let entry = inner.append(PendingEntry::for_record(
            &record,
            movement.direction.action(),
            delta,
        ));
        Ok(Committed { record, entry })
    }

    async fn get_stock(&self, id: StockId) -> Result<Option<StockRecord>> {
        Ok(self.read()?.records.get(&id).cloned())
    }

    async fn find_all(&self, query: &StockQuery) -> Result<Vec<StockRecord>> {
        Ok(self
            .read()?
            .records
            .values()
            .filter(|r| query.accepts(r))
            .cloned()
            .collect())
    }

    async fn search_stock(&self, needle: &str) -> Result<Vec<StockRecord>> {
        Ok(self
            .read()?
            .records
            .values()
            .filter(|r| r.matches(needle))
            .cloned()
            .collect())
    }

    async fn list_entries(&self, needle: &str) -> Result<Vec<LedgerEntry>> {
        let mut entries: Vec<LedgerEntry> = self
            .read()?
            .entries
            .iter()
            .filter(|e| e.matches(needle))
            .cloned()
            .collect();
        sort_newest_first(&mut entries);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StoreExt;
    use lotledger_core::Direction;

    fn movement(stock_id: StockId, amount: i64, direction: Direction) -> Movement {
        Movement {
            stock_id,
            amount,
            direction,
            allow_negative: true,
        }
    }

    #[tokio::test]
    async fn test_register_and_find() {
        let store = MemoryStore::new();
        let committed = store
            .register(&ItemKey::new("A001", "Widget", "LOT1"))
            .await
            .unwrap();

        let found = store
            .find_by(&StockQuery::by_lot("LOT1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, committed.record);
    }

    #[tokio::test]
    async fn test_duplicate_register_appends_nothing() {
        let store = MemoryStore::new();
        let key = ItemKey::new("A001", "Widget", "LOT1");
        store.register(&key).await.unwrap();

        let err = store.register(&key).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
        assert_eq!(store.list_entries("").await.unwrap().len(), 1);
        assert_eq!(store.search_stock("").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_movements_log_signed_deltas() {
        let store = MemoryStore::new();
        let id = store
            .register(&ItemKey::new("A001", "Widget", "LOT1"))
            .await
            .unwrap()
            .record
            .id;

        store.apply_movement(&movement(id, 10, Direction::Inbound)).await.unwrap();
        let out = store.apply_movement(&movement(id, 4, Direction::Outbound)).await.unwrap();
        assert_eq!(out.record.quantity, 6);
        assert_eq!(out.entry.quantity, -4);
        assert_eq!(out.entry.action, Action::Outbound);
    }

    #[tokio::test]
    async fn test_floor_rejection_changes_nothing() {
        let store = MemoryStore::new();
        let id = store
            .register(&ItemKey::new("A001", "Widget", "LOT1"))
            .await
            .unwrap()
            .record
            .id;

        let mut out = movement(id, 1, Direction::Outbound);
        out.allow_negative = false;
        let err = store.apply_movement(&out).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::InsufficientStock { available: 0, requested: 1, .. }
        ));
        assert_eq!(store.get_stock(id).await.unwrap().unwrap().quantity, 0);
        assert_eq!(store.list_entries("").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_frees_the_pair() {
        let store = MemoryStore::new();
        let key = ItemKey::new("A001", "Widget", "LOT1");
        let first = store.register(&key).await.unwrap().record;

        store.remove(&key.lot_key()).await.unwrap();
        assert!(store.get_stock(first.id).await.unwrap().is_none());

        let second = store.register(&key).await.unwrap().record;
        assert!(second.id > first.id);

        let err = store.remove(&LotKey::new("A001", "LOT9")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_with_dangling_index_keeps_index() {
        let store = MemoryStore::new();
        let key = ItemKey::new("A001", "Widget", "LOT1");
        let id = store.register(&key).await.unwrap().record.id;

        store.inner.write().unwrap().records.remove(&id);

        let err = store.remove(&key.lot_key()).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));

        let inner = store.inner.read().unwrap();
        assert_eq!(inner.lots.get(&key.lot_key()), Some(&id));
        assert_eq!(inner.entries.len(), 1);
    }
}
