//! Versioned, additive, idempotent schema migrations (§4.1 "Schema
//! evolution"). Each module exposes `pub fn migrate(conn) -> MemexResult<()>`
//! using `CREATE TABLE IF NOT EXISTS` so re-running a migration against an
//! already-migrated database is a no-op.

mod v001_entries;
mod v002_patterns_and_file_pairs;
mod v003_vectors;

use rusqlite::Connection;

use memex_core::errors::{MemexResult, StorageError};

const CURRENT_VERSION: i64 = 3;

/// Run every migration in order, tracking the applied version in
/// `schema_version` so a v0 store (created before this table existed) is
/// brought forward without losing any entries.
pub fn run_migrations(conn: &Connection) -> MemexResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);",
    )
    .map_err(StorageError::from)?;

    let applied: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
        .map_err(StorageError::from)?;

    if applied < 1 {
        v001_entries::migrate(conn).map_err(|e| StorageError::MigrationFailed {
            version: 1,
            reason: e.to_string(),
        })?;
    }
    if applied < 2 {
        v002_patterns_and_file_pairs::migrate(conn).map_err(|e| StorageError::MigrationFailed {
            version: 2,
            reason: e.to_string(),
        })?;
    }
    if applied < 3 {
        v003_vectors::migrate(conn).map_err(|e| StorageError::MigrationFailed {
            version: 3,
            reason: e.to_string(),
        })?;
    }

    if applied < CURRENT_VERSION {
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [CURRENT_VERSION],
        )
        .map_err(StorageError::from)?;
    }

    Ok(())
}
