//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//! - Reconcile the schema before returning a usable connection.
//!
//! # Invariants
//! - Returned connections carry the current schema version.
//! - A version mismatch is resolved by destructive reset, never by error.

use super::schema::{ensure_schema, SchemaAction};
use super::DbResult;
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a SQLite database file, creating parent directories when missing.
///
/// # Side effects
/// - May drop all existing tables when the stored schema version differs.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        if let Err(err) = std::fs::create_dir_all(parent) {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_dir_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    }

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(conn, "file", started_at)
}

/// Opens an in-memory SQLite database with the current schema.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    finish_open(conn, "memory", started_at)
}

fn finish_open(mut conn: Connection, mode: &str, started_at: Instant) -> DbResult<Connection> {
    match bootstrap_connection(&mut conn) {
        Ok(SchemaAction::Reset { from_version }) => {
            warn!(
                "event=db_open module=db status=ok mode={} duration_ms={} schema=reset from_version={}",
                mode,
                started_at.elapsed().as_millis(),
                from_version
            );
            Ok(conn)
        }
        Ok(action) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={} schema={}",
                mode,
                started_at.elapsed().as_millis(),
                schema_action_label(action)
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<SchemaAction> {
    conn.busy_timeout(Duration::from_secs(5))?;
    ensure_schema(conn)
}

fn schema_action_label(action: SchemaAction) -> &'static str {
    match action {
        SchemaAction::Created => "created",
        SchemaAction::Current => "current",
        SchemaAction::Reset { .. } => "reset",
    }
}
