//! Ledger entries: the immutable audit trail of stock mutations.
//!
//! An entry snapshots the identity of the record it describes, so it stays
//! readable after the record itself is deleted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::record::{identity_contains, StockRecord};
use crate::types::{EntryId, StockId};

/// The kind of mutation an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// A new record was created with quantity 0.
    Register,
    /// Stock was received.
    Inbound,
    /// Stock was issued.
    Outbound,
    /// The record was deleted.
    Delete,
}

impl Action {
    /// Stable storage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Register => "REGISTER",
            Self::Inbound => "INBOUND",
            Self::Outbound => "OUTBOUND",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGISTER" => Ok(Self::Register),
            "INBOUND" => Ok(Self::Inbound),
            "OUTBOUND" => Ok(Self::Outbound),
            "DELETE" => Ok(Self::Delete),
            other => Err(ValidationError::UnknownAction(other.to_string())),
        }
    }
}

/// Direction of a quantity movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    /// Signed delta applied to the on-hand quantity for `amount`.
    ///
    /// The sign comes from the direction alone; the sign of `amount` is ignored.
    pub fn signed(self, amount: i64) -> i64 {
        let magnitude = amount.saturating_abs();
        match self {
            Self::Inbound => magnitude,
            Self::Outbound => -magnitude,
        }
    }

    pub const fn action(self) -> Action {
        match self {
            Self::Inbound => Action::Inbound,
            Self::Outbound => Action::Outbound,
        }
    }
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        direction.action()
    }
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Action>()? {
            Action::Inbound => Ok(Self::Inbound),
            Action::Outbound => Ok(Self::Outbound),
            other => Err(ValidationError::UnknownAction(other.to_string())),
        }
    }
}

/// One committed row of the ledger log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    /// Surrogate id of the record at event time. Not a live reference.
    pub stock_id: StockId,
    pub item_code: String,
    pub item_name: String,
    pub lot_number: String,
    /// Signed delta for movements, 0 for registration, the on-hand quantity
    /// at deletion time for deletes.
    pub quantity: i64,
    pub action: Action,
    /// Commit time in Unix milliseconds.
    pub timestamp: i64,
}

impl LedgerEntry {
    /// Case-sensitive substring match on any identifying field.
    pub fn matches(&self, needle: &str) -> bool {
        identity_contains(&self.item_code, &self.item_name, &self.lot_number, needle)
    }

    /// Unsigned size of the event.
    pub fn amount(&self) -> i64 {
        self.quantity.saturating_abs()
    }
}

/// An entry that has not been appended yet.
///
/// The log assigns the id, and the timestamp when none is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    pub stock_id: StockId,
    pub item_code: String,
    pub item_name: String,
    pub lot_number: String,
    pub quantity: i64,
    pub action: Action,
    pub timestamp: Option<i64>,
}

impl PendingEntry {
    /// Snapshot `record` for an event of kind `action`.
    pub fn for_record(record: &StockRecord, action: Action, quantity: i64) -> Self {
        Self {
            stock_id: record.id,
            item_code: record.item_code.clone(),
            item_name: record.item_name.clone(),
            lot_number: record.lot_number.clone(),
            quantity,
            action,
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Seal the entry with its log position.
    pub fn commit(self, id: EntryId, now: i64) -> LedgerEntry {
        LedgerEntry {
            id,
            stock_id: self.stock_id,
            item_code: self.item_code,
            item_name: self.item_name,
            lot_number: self.lot_number,
            quantity: self.quantity,
            action: self.action,
            timestamp: self.timestamp.unwrap_or(now),
        }
    }
}

/// Order entries newest first: timestamp descending, then insertion descending.
pub fn sort_newest_first(entries: &mut [LedgerEntry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> StockRecord {
        StockRecord {
            id: StockId(5),
            item_code: "A001".into(),
            item_name: "Widget".into(),
            lot_number: "LOT1".into(),
            quantity: 3,
        }
    }

    #[test]
    fn test_action_names_roundtrip() {
        for action in [Action::Register, Action::Inbound, Action::Outbound, Action::Delete] {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
        assert!("inbound".parse::<Action>().is_err());
    }

    #[test]
    fn test_action_serializes_as_storage_name() {
        assert_eq!(serde_json::to_string(&Action::Outbound).unwrap(), "\"OUTBOUND\"");
    }

    #[test]
    fn test_direction_sign_ignores_amount_sign() {
        assert_eq!(Direction::Inbound.signed(5), 5);
        assert_eq!(Direction::Inbound.signed(-5), 5);
        assert_eq!(Direction::Outbound.signed(5), -5);
        assert_eq!(Direction::Outbound.signed(-5), -5);
    }

    #[test]
    fn test_direction_rejects_non_movement_actions() {
        assert_eq!("INBOUND".parse::<Direction>().unwrap(), Direction::Inbound);
        assert!("DELETE".parse::<Direction>().is_err());
    }

    #[test]
    fn test_pending_entry_keeps_given_timestamp() {
        let pending = PendingEntry::for_record(&record(), Action::Inbound, 4).at(10);
        let entry = pending.commit(EntryId(1), 99);
        assert_eq!(entry.timestamp, 10);
        assert_eq!(entry.stock_id, StockId(5));

        let entry = PendingEntry::for_record(&record(), Action::Inbound, 4).commit(EntryId(2), 99);
        assert_eq!(entry.timestamp, 99);
    }

    #[test]
    fn test_sort_breaks_ties_by_reverse_insertion() {
        let base = PendingEntry::for_record(&record(), Action::Register, 0);
        let mut entries = vec![
            base.clone().at(100).commit(EntryId(1), 0),
            base.clone().at(100).commit(EntryId(2), 0),
            base.clone().at(50).commit(EntryId(3), 0),
            base.at(200).commit(EntryId(4), 0),
        ];
        sort_newest_first(&mut entries);
        let order: Vec<i64> = entries.iter().map(|e| e.id.get()).collect();
        assert_eq!(order, vec![4, 2, 1, 3]);
    }
}
