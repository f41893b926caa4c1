//! Stock records: the current on-hand quantity of one (item code, lot) pair.

use serde::{Deserialize, Serialize};

use crate::types::StockId;

/// The three identifying fields of an item lot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    pub item_code: String,
    pub item_name: String,
    pub lot_number: String,
}

impl ItemKey {
    /// Build a key from borrowed field values.
    pub fn new(
        item_code: impl Into<String>,
        item_name: impl Into<String>,
        lot_number: impl Into<String>,
    ) -> Self {
        Self {
            item_code: item_code.into(),
            item_name: item_name.into(),
            lot_number: lot_number.into(),
        }
    }

    /// The uniqueness key of this item lot.
    pub fn lot_key(&self) -> LotKey {
        LotKey::new(&self.item_code, &self.lot_number)
    }
}

/// The uniqueness key of a stock record: at most one record per pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LotKey {
    pub item_code: String,
    pub lot_number: String,
}

impl LotKey {
    pub fn new(item_code: impl Into<String>, lot_number: impl Into<String>) -> Self {
        Self {
            item_code: item_code.into(),
            lot_number: lot_number.into(),
        }
    }
}

/// A row of the stock table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: StockId,
    pub item_code: String,
    pub item_name: String,
    pub lot_number: String,
    /// On-hand quantity. Only goes below zero when the outbound policy allows it.
    pub quantity: i64,
}

impl StockRecord {
    /// Identity snapshot of this record.
    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.item_code, &self.item_name, &self.lot_number)
    }

    pub fn lot_key(&self) -> LotKey {
        LotKey::new(&self.item_code, &self.lot_number)
    }

    /// Case-sensitive substring match on any identifying field.
    pub fn matches(&self, needle: &str) -> bool {
        identity_contains(&self.item_code, &self.item_name, &self.lot_number, needle)
    }
}

/// Exact-match query over the identifying fields.
///
/// Every supplied field must match; an empty query matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockQuery {
    pub item_code: Option<String>,
    pub item_name: Option<String>,
    pub lot_number: Option<String>,
}

impl StockQuery {
    pub fn by_code(item_code: impl Into<String>) -> Self {
        Self {
            item_code: Some(item_code.into()),
            ..Self::default()
        }
    }

    pub fn by_name(item_name: impl Into<String>) -> Self {
        Self {
            item_name: Some(item_name.into()),
            ..Self::default()
        }
    }

    pub fn by_lot(lot_number: impl Into<String>) -> Self {
        Self {
            lot_number: Some(lot_number.into()),
            ..Self::default()
        }
    }

    /// Whether `record` satisfies every supplied field.
    pub fn accepts(&self, record: &StockRecord) -> bool {
        fn field_ok(wanted: &Option<String>, actual: &str) -> bool {
            wanted.as_deref().map_or(true, |w| w == actual)
        }

        field_ok(&self.item_code, &record.item_code)
            && field_ok(&self.item_name, &record.item_name)
            && field_ok(&self.lot_number, &record.lot_number)
    }
}

/// Substring search shared by the stock table and the ledger log.
pub(crate) fn identity_contains(code: &str, name: &str, lot: &str, needle: &str) -> bool {
    code.contains(needle) || name.contains(needle) || lot.contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> StockRecord {
        StockRecord {
            id: StockId(1),
            item_code: "A001".into(),
            item_name: "Widget".into(),
            lot_number: "LOT1".into(),
            quantity: 0,
        }
    }

    #[test]
    fn test_matches_is_case_sensitive() {
        let record = widget();
        assert!(record.matches("Widg"));
        assert!(record.matches("A00"));
        assert!(record.matches("OT1"));
        assert!(!record.matches("widget"));
        assert!(!record.matches("lot1"));
    }

    #[test]
    fn test_empty_needle_matches_everything() {
        assert!(widget().matches(""));
    }

    #[test]
    fn test_query_requires_every_supplied_field() {
        let record = widget();
        assert!(StockQuery::default().accepts(&record));
        assert!(StockQuery::by_code("A001").accepts(&record));
        assert!(!StockQuery::by_code("A00").accepts(&record));

        let both = StockQuery {
            item_code: Some("A001".into()),
            lot_number: Some("LOT2".into()),
            ..StockQuery::default()
        };
        assert!(!both.accepts(&record));
    }

    #[test]
    fn test_lot_key_ignores_name() {
        let a = ItemKey::new("A001", "Widget", "LOT1");
        let b = ItemKey::new("A001", "Gadget", "LOT1");
        assert_eq!(a.lot_key(), b.lot_key());
    }
}
