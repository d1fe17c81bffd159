//! Schema steps for the ledger database.
//!
//! # Invariants
//! - `version` values are strictly increasing, starting at 1.
//! - The highest applied version is mirrored to `PRAGMA user_version`.
//! - Pending steps apply in one transaction; a failing step rolls back all
//!   of them.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// One schema step.
#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const LEDGER_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "kv_store",
    sql: include_str!("0001_kv_store.sql"),
}];

/// Latest schema version this build can open.
pub fn latest_version() -> u32 {
    last_version(LEDGER_MIGRATIONS)
}

/// Brings the ledger schema up to [`latest_version`].
///
/// Returns the number of steps applied; `0` when already current.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    apply_steps(conn, LEDGER_MIGRATIONS)
}

/// Reads `PRAGMA user_version` from the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn last_version(steps: &[Migration]) -> u32 {
    steps.last().map_or(0, |step| step.version)
}

fn apply_steps(conn: &mut Connection, steps: &[Migration]) -> DbResult<usize> {
    let from = current_user_version(conn)?;
    let to = last_version(steps);

    if from > to {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }
    if from == to {
        return Ok(0);
    }

    let pending: Vec<&Migration> = steps.iter().filter(|step| step.version > from).collect();
    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::Migration {
                version: step.version,
                name: step.name,
                source,
            })?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from} to_version={to} applied={}",
        pending.len()
    );
    Ok(pending.len())
}
