//! Record Store: SQL over the `stock_records` table.
//!
//! These functions take a plain connection so callers can run them inside
//! whatever transaction they have open. None of them commit.

use lotledger_core::{ItemKey, LotKey, StockId, StockQuery, StockRecord};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};

const COLUMNS: &str = "id, item_code, item_name, lot_number, quantity";

pub(crate) fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<StockRecord> {
    Ok(StockRecord {
        id: StockId(row.get("id")?),
        item_code: row.get("item_code")?,
        item_name: row.get("item_name")?,
        lot_number: row.get("lot_number")?,
        quantity: row.get("quantity")?,
    })
}

/// Insert a record with quantity 0.
pub fn create(conn: &Connection, key: &ItemKey) -> Result<StockRecord> {
    if find_by_lot_key(conn, &key.lot_key())?.is_some() {
        return Err(duplicate(&key.item_code, &key.lot_number));
    }

    conn.execute(
        "INSERT INTO stock_records (item_code, item_name, lot_number, quantity)
         VALUES (?1, ?2, ?3, 0)",
        params![key.item_code, key.item_name, key.lot_number],
    )
    .map_err(|e| match e {
        // The UNIQUE constraint is authoritative.
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            duplicate(&key.item_code, &key.lot_number)
        }
        other => StoreError::from(other),
    })?;

    Ok(StockRecord {
        id: StockId(conn.last_insert_rowid()),
        item_code: key.item_code.clone(),
        item_name: key.item_name.clone(),
        lot_number: key.lot_number.clone(),
        quantity: 0,
    })
}

/// Delete the record for `key`, returning it as it was before removal.
pub fn delete(conn: &Connection, key: &LotKey) -> Result<StockRecord> {
    let record = find_by_lot_key(conn, key)?.ok_or_else(|| {
        StoreError::NotFound(format!(
            "item_code={} lot_number={}",
            key.item_code, key.lot_number
        ))
    })?;

    conn.execute("DELETE FROM stock_records WHERE id = ?1", params![record.id.get()])?;
    Ok(record)
}

/// Add `delta` to a record's quantity.
///
/// With `allow_negative` unset, a result below zero is refused. The caller
/// must hold the write lock for the read and the update to be atomic.
pub fn adjust(
    conn: &Connection,
    id: StockId,
    delta: i64,
    allow_negative: bool,
) -> Result<StockRecord> {
    let mut record = get(conn, id)?.ok_or_else(|| StoreError::NotFound(format!("id={}", id)))?;

    let quantity = record
        .quantity
        .checked_add(delta)
        .ok_or(StoreError::QuantityOverflow(id))?;

    if quantity < 0 && !allow_negative {
        return Err(StoreError::InsufficientStock {
            stock_id: id,
            available: record.quantity,
            requested: delta.saturating_abs(),
        });
    }

    conn.execute(
        "UPDATE stock_records SET quantity = ?2 WHERE id = ?1",
        params![id.get(), quantity],
    )?;

    record.quantity = quantity;
    Ok(record)
}

pub fn get(conn: &Connection, id: StockId) -> Result<Option<StockRecord>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM stock_records WHERE id = ?1"),
        params![id.get()],
        row_to_record,
    )
    .optional()
    .map_err(StoreError::from)
}

pub fn find_by_lot_key(conn: &Connection, key: &LotKey) -> Result<Option<StockRecord>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM stock_records WHERE item_code = ?1 AND lot_number = ?2"),
        params![key.item_code, key.lot_number],
        row_to_record,
    )
    .optional()
    .map_err(StoreError::from)
}

/// Exact match on every supplied field, in table order.
pub fn find_all(conn: &Connection, query: &StockQuery) -> Result<Vec<StockRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {COLUMNS} FROM stock_records
         WHERE (?1 IS NULL OR item_code = ?1)
           AND (?2 IS NULL OR item_name = ?2)
           AND (?3 IS NULL OR lot_number = ?3)
         ORDER BY id"
    ))?;

    let records = stmt
        .query_map(
            params![query.item_code, query.item_name, query.lot_number],
            row_to_record,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(records)
}

/// Case-sensitive substring search. `instr` is used rather than `LIKE`,
/// which folds ASCII case.
pub fn search(conn: &Connection, needle: &str) -> Result<Vec<StockRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {COLUMNS} FROM stock_records
         WHERE ?1 = ''
            OR instr(item_code, ?1) > 0
            OR instr(item_name, ?1) > 0
            OR instr(lot_number, ?1) > 0
         ORDER BY id"
    ))?;

    let records = stmt
        .query_map(params![needle], row_to_record)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(records)
}

fn duplicate(item_code: &str, lot_number: &str) -> StoreError {
    StoreError::DuplicateKey {
        item_code: item_code.to_string(),
        lot_number: lot_number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration;

    fn conn() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        migration::migrate(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_create_then_get() {
        let conn = conn();
        let created = create(&conn, &ItemKey::new("A001", "Widget", "LOT1")).unwrap();
        assert_eq!(created.quantity, 0);

        let fetched = get(&conn, created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_create_rejects_duplicate_pair() {
        let conn = conn();
        create(&conn, &ItemKey::new("A001", "Widget", "LOT1")).unwrap();

        let err = create(&conn, &ItemKey::new("A001", "Other name", "LOT1")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));

        // Same code, different lot is a separate record.
        create(&conn, &ItemKey::new("A001", "Widget", "LOT2")).unwrap();
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let conn = conn();
        let first = create(&conn, &ItemKey::new("A001", "Widget", "LOT1")).unwrap();
        delete(&conn, &first.lot_key()).unwrap();
        let second = create(&conn, &ItemKey::new("A001", "Widget", "LOT1")).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let conn = conn();
        let err = delete(&conn, &LotKey::new("A001", "LOT1")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_adjust_floor() {
        let conn = conn();
        let record = create(&conn, &ItemKey::new("A001", "Widget", "LOT1")).unwrap();

        assert_eq!(adjust(&conn, record.id, 3, false).unwrap().quantity, 3);

        let err = adjust(&conn, record.id, -5, false).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InsufficientStock { available: 3, requested: 5, .. }
        ));
        assert_eq!(get(&conn, record.id).unwrap().unwrap().quantity, 3);

        assert_eq!(adjust(&conn, record.id, -5, true).unwrap().quantity, -2);
    }

    #[test]
    fn test_adjust_overflow() {
        let conn = conn();
        let record = create(&conn, &ItemKey::new("A001", "Widget", "LOT1")).unwrap();
        adjust(&conn, record.id, i64::MAX, true).unwrap();
        let err = adjust(&conn, record.id, 1, true).unwrap_err();
        assert!(matches!(err, StoreError::QuantityOverflow(id) if id == record.id));
    }

    #[test]
    fn test_search_is_case_sensitive() {
        let conn = conn();
        create(&conn, &ItemKey::new("A001", "Widget", "LOT1")).unwrap();
        create(&conn, &ItemKey::new("B002", "widget mini", "lot9")).unwrap();

        let hits = search(&conn, "Widget").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].item_code, "A001");

        let hits = search(&conn, "lot").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].item_code, "B002");

        assert_eq!(search(&conn, "").unwrap().len(), 2);
    }

    #[test]
    fn test_find_all_in_insertion_order() {
        let conn = conn();
        create(&conn, &ItemKey::new("A001", "Widget", "LOT2")).unwrap();
        create(&conn, &ItemKey::new("A001", "Widget", "LOT1")).unwrap();

        let hits = find_all(&conn, &StockQuery::by_code("A001")).unwrap();
        let lots: Vec<&str> = hits.iter().map(|r| r.lot_number.as_str()).collect();
        assert_eq!(lots, vec!["LOT2", "LOT1"]);

        assert!(find_all(&conn, &StockQuery::by_name("Gadget")).unwrap().is_empty());
    }
}
