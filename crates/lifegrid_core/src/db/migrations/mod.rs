//! Schema steps for the `kv_store` database.
//!
//! Each step runs in its own transaction and bumps `PRAGMA user_version`
//! in that same transaction, so an interrupted upgrade resumes at the
//! first missing step.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// One schema step: `sql` takes the database from `version - 1` to `version`.
struct SchemaStep {
    version: u32,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Upgrades `conn` to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `Migration` naming the step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let latest = latest_version();
    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    for step in SCHEMA_STEPS.iter().skip_while(|step| step.version <= found) {
        run_step(conn, step).map_err(|source| DbError::Migration {
            version: step.version,
            source,
        })?;
        info!(
            "event=db_migrate module=db status=ok from={} to={}",
            step.version - 1,
            step.version
        );
    }
    Ok(())
}

fn run_step(conn: &mut Connection, step: &SchemaStep) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", step.version)?;
    tx.commit()
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
