//! Schema definition and destructive version reconciliation.
//!
//! # Responsibility
//! - Create the `employees` table on a fresh database.
//! - Replace any database whose schema version differs from this binary's.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A version mismatch never migrates: every user table and view is dropped
//!   and the schema is recreated inside one transaction.

use crate::db::DbResult;
use log::warn;
use rusqlite::{Connection, TransactionBehavior};

/// Schema version written by this binary.
pub const SCHEMA_VERSION: u32 = 1;
/// Name of the single table.
pub const EMPLOYEES_TABLE: &str = "employees";
/// Column storing `Employee::email`.
pub const EMAIL_ID_COLUMN: &str = "email_id";
/// Default database file name used when no path is configured.
pub const DATABASE_FILE_NAME: &str = "roster_employees.sqlite3";
/// Columns every usable `employees` table must expose.
pub const REQUIRED_EMPLOYEE_COLUMNS: &[&str] = &["id", "name", EMAIL_ID_COLUMN];

const SCHEMA_SQL: &str = include_str!("employees.sql");

/// Outcome of reconciling a connection with the current schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    /// Empty database; schema created.
    Created,
    /// Schema already at `SCHEMA_VERSION`; nothing done.
    Current,
    /// Version mismatch; all prior objects dropped and schema recreated.
    Reset { from_version: u32 },
}

/// Brings the connection to `SCHEMA_VERSION`, discarding data on mismatch.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<SchemaAction> {
    if current_user_version(conn)? == SCHEMA_VERSION {
        return Ok(SchemaAction::Current);
    }

    // Re-read under the write lock; another connection may have won the race.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current_version = current_user_version(&tx)?;
    if current_version == SCHEMA_VERSION {
        tx.commit()?;
        return Ok(SchemaAction::Current);
    }

    let objects = user_objects(&tx)?;
    if current_version == 0 && objects.is_empty() {
        create_schema(&tx)?;
        tx.commit()?;
        return Ok(SchemaAction::Created);
    }

    warn!(
        "event=schema_reset module=db status=start from_version={} to_version={} dropped_objects={}",
        current_version,
        SCHEMA_VERSION,
        objects.len()
    );

    for (kind, name) in &objects {
        tx.execute_batch(&format!(
            "DROP {kind} IF EXISTS {};",
            quote_identifier(name)
        ))?;
    }
    create_schema(&tx)?;
    tx.commit()?;

    Ok(SchemaAction::Reset {
        from_version: current_version,
    })
}

/// Reads `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn create_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    Ok(())
}

/// Lists droppable objects, views first so no view outlives its table.
fn user_objects(conn: &Connection) -> DbResult<Vec<(&'static str, String)>> {
    let mut stmt = conn.prepare(
        "SELECT type, name
         FROM sqlite_master
         WHERE type IN ('view', 'table')
           AND name NOT LIKE 'sqlite_%'
         ORDER BY CASE type WHEN 'view' THEN 0 ELSE 1 END, name;",
    )?;
    let mut rows = stmt.query([])?;
    let mut objects = Vec::new();
    while let Some(row) = rows.next()? {
        let kind: String = row.get(0)?;
        let kind = if kind == "view" { "VIEW" } else { "TABLE" };
        objects.push((kind, row.get::<_, String>(1)?));
    }
    Ok(objects)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
