//! Ledger Log: SQL over the append-only `ledger_entries` table.

use lotledger_core::{Action, EntryId, LedgerEntry, PendingEntry, StockId};
use rusqlite::{params, Connection};

use crate::error::Result;

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<LedgerEntry> {
    let action: String = row.get("action")?;
    let action: Action = action.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(LedgerEntry {
        id: EntryId(row.get("id")?),
        stock_id: StockId(row.get("stock_id")?),
        item_code: row.get("item_code")?,
        item_name: row.get("item_name")?,
        lot_number: row.get("lot_number")?,
        quantity: row.get("quantity")?,
        action,
        timestamp: row.get("timestamp")?,
    })
}

/// Append an entry. `now` is used when the entry carries no timestamp.
pub fn append(conn: &Connection, entry: PendingEntry, now: i64) -> Result<LedgerEntry> {
    let timestamp = entry.timestamp.unwrap_or(now);

    conn.execute(
        "INSERT INTO ledger_entries
            (stock_id, item_code, item_name, lot_number, quantity, action, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.stock_id.get(),
            entry.item_code,
            entry.item_name,
            entry.lot_number,
            entry.quantity,
            entry.action.as_str(),
            timestamp,
        ],
    )?;

    Ok(entry.commit(EntryId(conn.last_insert_rowid()), timestamp))
}

/// Entries matching `needle`, newest first.
pub fn list(conn: &Connection, needle: &str) -> Result<Vec<LedgerEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, stock_id, item_code, item_name, lot_number, quantity, action, timestamp
         FROM ledger_entries
         WHERE ?1 = ''
            OR instr(item_code, ?1) > 0
            OR instr(item_name, ?1) > 0
            OR instr(lot_number, ?1) > 0
         ORDER BY timestamp DESC, id DESC",
    )?;

    let entries = stmt
        .query_map(params![needle], row_to_entry)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(entries)
}
