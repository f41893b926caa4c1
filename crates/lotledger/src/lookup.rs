//! Lookup Index: exact-match resolution of one identifying field to the
//! other two.
//!
//! A read-only view over the stock table. It holds no state of its own, so
//! every lookup reflects the latest committed records.

use lotledger_core::{StockQuery, StockRecord};
use lotledger_store::{Store, StoreExt};
use serde::{Deserialize, Serialize};

use crate::config::LookupPolicy;
use crate::error::{LedgerError, Result};

/// Result of a lookup by item code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameAndLot {
    pub item_name: String,
    pub lot_number: String,
}

/// Result of a lookup by item name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeAndLot {
    pub item_code: String,
    pub lot_number: String,
}

/// Result of a lookup by lot number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeAndName {
    pub item_code: String,
    pub item_name: String,
}

/// Three named lookups over a [`Store`].
pub struct LookupIndex<'a, S: Store + ?Sized> {
    store: &'a S,
    policy: LookupPolicy,
}

impl<'a, S: Store + ?Sized> LookupIndex<'a, S> {
    pub fn new(store: &'a S, policy: LookupPolicy) -> Self {
        Self { store, policy }
    }

    /// Resolve an item code to its name and lot number.
    pub async fn by_code(&self, item_code: &str) -> Result<NameAndLot> {
        let record = self
            .resolve("item_code", item_code, StockQuery::by_code(item_code))
            .await?;
        Ok(NameAndLot {
            item_name: record.item_name,
            lot_number: record.lot_number,
        })
    }

    /// Resolve an item name to its code and lot number.
    pub async fn by_name(&self, item_name: &str) -> Result<CodeAndLot> {
        let record = self
            .resolve("item_name", item_name, StockQuery::by_name(item_name))
            .await?;
        Ok(CodeAndLot {
            item_code: record.item_code,
            lot_number: record.lot_number,
        })
    }

    /// Resolve a lot number to its item code and name.
    pub async fn by_lot(&self, lot_number: &str) -> Result<CodeAndName> {
        let record = self
            .resolve("lot_number", lot_number, StockQuery::by_lot(lot_number))
            .await?;
        Ok(CodeAndName {
            item_code: record.item_code,
            item_name: record.item_name,
        })
    }

    async fn resolve(
        &self,
        field: &'static str,
        value: &str,
        query: StockQuery,
    ) -> Result<StockRecord> {
        let not_found = || LedgerError::NotFound(format!("{}={}", field, value));

        match self.policy {
            LookupPolicy::FirstMatch => self.store.find_by(&query).await?.ok_or_else(not_found),
            LookupPolicy::RejectAmbiguous => {
                let mut matches = self.store.find_all(&query).await?;
                match matches.len() {
                    0 => Err(not_found()),
                    1 => Ok(matches.remove(0)),
                    count => {
                        tracing::warn!(field, value, count, "ambiguous lookup rejected");
                        Err(LedgerError::AmbiguousMatch {
                            field,
                            value: value.to_string(),
                            count,
                        })
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotledger_core::ItemKey;
    use lotledger_store::MemoryStore;

    async fn store_with_two_lots() -> MemoryStore {
        let store = MemoryStore::new();
        store.register(&ItemKey::new("A001", "Widget", "LOT1")).await.unwrap();
        store.register(&ItemKey::new("A001", "Widget", "LOT2")).await.unwrap();
        store.register(&ItemKey::new("B002", "Gadget", "LOT3")).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_each_key_resolves_the_other_two() {
        let store = store_with_two_lots().await;
        let index = LookupIndex::new(&store, LookupPolicy::FirstMatch);

        assert_eq!(
            index.by_code("B002").await.unwrap(),
            NameAndLot {
                item_name: "Gadget".into(),
                lot_number: "LOT3".into()
            }
        );
        assert_eq!(
            index.by_name("Gadget").await.unwrap(),
            CodeAndLot {
                item_code: "B002".into(),
                lot_number: "LOT3".into()
            }
        );
        assert_eq!(
            index.by_lot("LOT3").await.unwrap(),
            CodeAndName {
                item_code: "B002".into(),
                item_name: "Gadget".into()
            }
        );
    }

    #[tokio::test]
    async fn test_first_match_is_earliest_registered() {
        let store = store_with_two_lots().await;
        let index = LookupIndex::new(&store, LookupPolicy::FirstMatch);
        assert_eq!(index.by_code("A001").await.unwrap().lot_number, "LOT1");
    }

    #[tokio::test]
    async fn test_reject_ambiguous() {
        let store = store_with_two_lots().await;
        let index = LookupIndex::new(&store, LookupPolicy::RejectAmbiguous);

        let err = index.by_name("Widget").await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::AmbiguousMatch { field: "item_name", count: 2, .. }
        ));

        // Unique keys still resolve.
        assert_eq!(index.by_lot("LOT2").await.unwrap().item_code, "A001");
    }

    #[tokio::test]
    async fn test_lookup_is_exact_and_case_sensitive() {
        let store = store_with_two_lots().await;
        let index = LookupIndex::new(&store, LookupPolicy::FirstMatch);

        assert!(matches!(index.by_code("A00").await, Err(LedgerError::NotFound(_))));
        assert!(matches!(index.by_name("widget").await, Err(LedgerError::NotFound(_))));
    }
}
