//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL batch
//! that transforms the schema from version N to N+1.

use lotledger_core::now_millis;
use rusqlite::{Connection, TransactionBehavior};

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 2;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely,
/// including from several connections opening the same file at once. The
/// version is read and advanced under one immediate transaction, so only the
/// first connection applies anything and the rest see the result.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = tx.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current, CURRENT_VERSION
        )));
    }

    for version in (current + 1)..=CURRENT_VERSION {
        apply_migration(&tx, version)?;

        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            rusqlite::params![version, now_millis()],
        )?;
    }

    tx.commit()?;
    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        2 => apply_v2(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: stock table and ledger log.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Current stock: one row per (item_code, lot_number)
        CREATE TABLE stock_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,  -- never reused after delete
            item_code TEXT NOT NULL,
            item_name TEXT NOT NULL,
            lot_number TEXT NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 0,

            UNIQUE(item_code, lot_number)
        );

        -- Audit log: identity is a snapshot, stock_id is not a foreign key
        CREATE TABLE ledger_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,  -- insertion order, tie-breaker
            stock_id INTEGER NOT NULL,
            item_code TEXT NOT NULL,
            item_name TEXT NOT NULL,
            lot_number TEXT NOT NULL,
            quantity INTEGER NOT NULL,             -- signed delta of the event
            action TEXT NOT NULL
                CHECK (action IN ('REGISTER', 'INBOUND', 'OUTBOUND', 'DELETE')),
            timestamp INTEGER NOT NULL             -- commit time (Unix ms)
        );

        -- Lookup by name and by lot; (item_code, lot_number) is covered by UNIQUE
        CREATE INDEX idx_stock_item_name ON stock_records(item_name);
        CREATE INDEX idx_stock_lot_number ON stock_records(lot_number);

        -- History listing order
        CREATE INDEX idx_ledger_timestamp ON ledger_entries(timestamp, id);
        "#,
    )?;

    Ok(())
}

/// Migration v2: reject any change to committed ledger entries.
fn apply_v2(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TRIGGER ledger_entries_no_update
        BEFORE UPDATE ON ledger_entries
        BEGIN
            SELECT RAISE(ABORT, 'ledger entries are append-only');
        END;

        CREATE TRIGGER ledger_entries_no_delete
        BEFORE DELETE ON ledger_entries
        BEGIN
            SELECT RAISE(ABORT, 'ledger entries are append-only');
        END;
        "#,
    )?;

    Ok(())
}
