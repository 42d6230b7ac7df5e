//! v002: patterns, pattern membership, and file-pair co-change tables
//! (§3.3, §3.4).

use rusqlite::Connection;

use memex_core::errors::{MemexResult, StorageError};

pub fn migrate(conn: &Connection) -> MemexResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS patterns (
            id                TEXT PRIMARY KEY,
            label             TEXT NOT NULL,
            occurrence_count  INTEGER NOT NULL DEFAULT 0,
            first_seen        TEXT NOT NULL,
            last_seen         TEXT NOT NULL,
            resolved          INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS pattern_entries (
            pattern_id TEXT NOT NULL REFERENCES patterns(id) ON DELETE CASCADE,
            entry_id   TEXT NOT NULL,
            PRIMARY KEY (pattern_id, entry_id)
        );

        CREATE INDEX IF NOT EXISTS idx_pattern_entries_entry ON pattern_entries(entry_id);
        CREATE INDEX IF NOT EXISTS idx_patterns_resolved ON patterns(resolved, last_seen);

        CREATE TABLE IF NOT EXISTS file_pairs (
            project         TEXT NOT NULL,
            file_a          TEXT NOT NULL,
            file_b          TEXT NOT NULL,
            co_change_count INTEGER NOT NULL DEFAULT 1,
            last_seen       TEXT NOT NULL,
            PRIMARY KEY (project, file_a, file_b)
        );

        CREATE INDEX IF NOT EXISTS idx_file_pairs_a ON file_pairs(project, file_a);
        CREATE INDEX IF NOT EXISTS idx_file_pairs_b ON file_pairs(project, file_b);
        ",
    )
    .map_err(StorageError::from)?;
    Ok(())
}
