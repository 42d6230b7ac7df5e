//! v001: the `entries` table plus its FTS5 lexical index (§3.1, §4.1).
//!
//! Split into three phases so a genuine v0 database (created before
//! `tier`/`access_count`/`pinned`/`archived`/`label`/`project`/
//! `session_id`/`agent_id` existed, predating `schema_version` itself)
//! is brought forward additively rather than silently left on its old,
//! narrower schema: (1) create the table if it doesn't exist at all,
//! (2) `PRAGMA table_info` + `ALTER TABLE … ADD COLUMN` for whatever is
//! missing, backfilling `tier` by type, (3) indexes/FTS/triggers, which
//! reference the late columns and so must run after they're in place.

use std::collections::HashSet;

use rusqlite::Connection;

use memex_core::errors::{MemexResult, StorageError};

const CREATE_ENTRIES_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS entries (
        id            TEXT PRIMARY KEY,
        date          TEXT NOT NULL,
        time          TEXT NOT NULL,
        entry_type    TEXT NOT NULL,
        tags          TEXT NOT NULL DEFAULT '[]',
        content       TEXT NOT NULL,
        source_file   TEXT,
        tier          TEXT NOT NULL DEFAULT 'working',
        access_count  INTEGER NOT NULL DEFAULT 0,
        last_accessed TEXT,
        pinned        INTEGER NOT NULL DEFAULT 0,
        archived      INTEGER NOT NULL DEFAULT 0,
        label         TEXT,
        project       TEXT,
        session_id    TEXT,
        agent_id      TEXT
    );
";

const CREATE_INDEXES_AND_FTS: &str = "
    CREATE UNIQUE INDEX IF NOT EXISTS idx_entries_rule_label
        ON entries(label) WHERE entry_type = 'rule';
    CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);
    CREATE INDEX IF NOT EXISTS idx_entries_type ON entries(entry_type);
    CREATE INDEX IF NOT EXISTS idx_entries_project ON entries(project);
    CREATE INDEX IF NOT EXISTS idx_entries_session ON entries(session_id);

    CREATE VIRTUAL TABLE IF NOT EXISTS entries_fts USING fts5(
        content, tags, entry_type,
        content='entries', content_rowid='rowid',
        tokenize = 'porter unicode61'
    );

    CREATE TRIGGER IF NOT EXISTS entries_ai AFTER INSERT ON entries BEGIN
        INSERT INTO entries_fts(rowid, content, tags, entry_type)
        VALUES (new.rowid, new.content, new.tags, new.entry_type);
    END;

    CREATE TRIGGER IF NOT EXISTS entries_ad AFTER DELETE ON entries BEGIN
        INSERT INTO entries_fts(entries_fts, rowid, content, tags, entry_type)
        VALUES ('delete', old.rowid, old.content, old.tags, old.entry_type);
    END;

    CREATE TRIGGER IF NOT EXISTS entries_au AFTER UPDATE ON entries BEGIN
        INSERT INTO entries_fts(entries_fts, rowid, content, tags, entry_type)
        VALUES ('delete', old.rowid, old.content, old.tags, old.entry_type);
        INSERT INTO entries_fts(rowid, content, tags, entry_type)
        VALUES (new.rowid, new.content, new.tags, new.entry_type);
    END;
";

/// `(column, DDL)` for every column introduced after the original v0
/// shape (`id, date, time, entry_type, tags, content, source_file`).
const LATE_COLUMNS: &[(&str, &str)] = &[
    ("tier", "ALTER TABLE entries ADD COLUMN tier TEXT NOT NULL DEFAULT 'working'"),
    ("access_count", "ALTER TABLE entries ADD COLUMN access_count INTEGER NOT NULL DEFAULT 0"),
    ("last_accessed", "ALTER TABLE entries ADD COLUMN last_accessed TEXT"),
    ("pinned", "ALTER TABLE entries ADD COLUMN pinned INTEGER NOT NULL DEFAULT 0"),
    ("archived", "ALTER TABLE entries ADD COLUMN archived INTEGER NOT NULL DEFAULT 0"),
    ("label", "ALTER TABLE entries ADD COLUMN label TEXT"),
    ("project", "ALTER TABLE entries ADD COLUMN project TEXT"),
    ("session_id", "ALTER TABLE entries ADD COLUMN session_id TEXT"),
    ("agent_id", "ALTER TABLE entries ADD COLUMN agent_id TEXT"),
];

pub fn migrate(conn: &Connection) -> MemexResult<()> {
    conn.execute_batch(CREATE_ENTRIES_TABLE).map_err(StorageError::from)?;
    backfill_late_columns(conn)?;
    conn.execute_batch(CREATE_INDEXES_AND_FTS).map_err(StorageError::from)?;
    Ok(())
}

/// Detect a pre-existing `entries` table missing any of `LATE_COLUMNS` via
/// `PRAGMA table_info` and add them additively (§4.1 "Schema evolution").
/// A no-op against a table that already has every column — including one
/// just created fresh by `CREATE_ENTRIES_TABLE` above.
fn backfill_late_columns(conn: &Connection) -> MemexResult<()> {
    let existing = existing_columns(conn, "entries")?;
    let mut tier_was_added = false;

    for (column, ddl) in LATE_COLUMNS {
        if !existing.contains(*column) {
            conn.execute(ddl, []).map_err(StorageError::from)?;
            if *column == "tier" {
                tier_was_added = true;
            }
        }
    }

    // Only a genuine v0 table lacked `tier`; a table that already had it
    // keeps whatever tier its rows were saved with. Back-fill by type
    // (§4.1): `handoff,progress → ephemeral`, `reference → longterm`,
    // else `working` (the column default, left as-is for every other
    // type).
    if tier_was_added {
        conn.execute(
            "UPDATE entries SET tier = CASE entry_type
                WHEN 'handoff' THEN 'ephemeral'
                WHEN 'progress' THEN 'ephemeral'
                WHEN 'reference' THEN 'longterm'
                ELSE 'working'
             END",
            [],
        )
        .map_err(StorageError::from)?;
    }

    Ok(())
}

fn existing_columns(conn: &Connection, table: &str) -> MemexResult<HashSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .map_err(StorageError::from)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .map_err(StorageError::from)?
        .collect::<rusqlite::Result<HashSet<String>>>()
        .map_err(StorageError::from)?;
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn open() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    /// A narrow v0 table, predating every late column.
    fn create_v0_entries(conn: &Connection) {
        conn.execute_batch(
            "CREATE TABLE entries (
                id          TEXT PRIMARY KEY,
                date        TEXT NOT NULL,
                time        TEXT NOT NULL,
                entry_type  TEXT NOT NULL,
                tags        TEXT NOT NULL DEFAULT '[]',
                content     TEXT NOT NULL,
                source_file TEXT
            );",
        )
        .unwrap();
    }

    #[test]
    fn migrate_adds_every_late_column_to_a_v0_table() {
        let conn = open();
        create_v0_entries(&conn);
        conn.execute(
            "INSERT INTO entries (id, date, time, entry_type, content) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params!["a1", "2026-01-01", "09:00", "handoff", "end of day"],
        )
        .unwrap();

        migrate(&conn).unwrap();

        let columns = existing_columns(&conn, "entries").unwrap();
        for (column, _) in LATE_COLUMNS {
            assert!(columns.contains(*column), "missing column {column}");
        }

        let tier: String = conn
            .query_row("SELECT tier FROM entries WHERE id = 'a1'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(tier, "ephemeral");

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 1, "migration must not lose entries");
    }

    #[test]
    fn migrate_is_idempotent_against_an_already_current_table() {
        let conn = open();
        migrate(&conn).unwrap();
        // Running it again must not error and must not touch data.
        conn.execute(
            "INSERT INTO entries (id, date, time, entry_type, tags, content, tier)
             VALUES ('b1', '2026-01-01', '09:00', 'decision', '[]', 'chose sqlite', 'longterm')",
            [],
        )
        .unwrap();
        migrate(&conn).unwrap();

        let tier: String = conn
            .query_row("SELECT tier FROM entries WHERE id = 'b1'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(tier, "longterm", "re-running migrate must not clobber existing tier values");
    }

    #[test]
    fn tier_backfill_respects_type_specific_rules() {
        let conn = open();
        create_v0_entries(&conn);
        let rows = [
            ("h1", "handoff"),
            ("p1", "progress"),
            ("r1", "reference"),
            ("d1", "decision"),
        ];
        for (id, entry_type) in rows {
            conn.execute(
                "INSERT INTO entries (id, date, time, entry_type, content) VALUES (?1, '2026-01-01', '09:00', ?2, 'x')",
                rusqlite::params![id, entry_type],
            )
            .unwrap();
        }

        migrate(&conn).unwrap();

        let tier_of = |conn: &Connection, id: &str| -> String {
            conn.query_row("SELECT tier FROM entries WHERE id = ?1", [id], |r| r.get(0)).unwrap()
        };
        assert_eq!(tier_of(&conn, "h1"), "ephemeral");
        assert_eq!(tier_of(&conn, "p1"), "ephemeral");
        assert_eq!(tier_of(&conn, "r1"), "longterm");
        assert_eq!(tier_of(&conn, "d1"), "working");

        let _ = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    }
}
