//! Rule save/delete/list (§3.1 lifecycle point (d), §4.1).

use rusqlite::{params, Connection};

use memex_core::errors::{MemexResult, StorageError};
use memex_core::{Clock, Entry, EntryType, Tier};

/// Upsert-by-label: deletes any prior row with `(type='rule', label)` and
/// inserts a new one with `tier='longterm'`, `pinned=true`, empty tags.
pub fn save_rule(conn: &Connection, label: &str, content: &str, clock: &Clock) -> MemexResult<Entry> {
    conn.execute(
        "DELETE FROM entries WHERE entry_type = 'rule' AND label = ?1",
        params![label],
    )
    .map_err(StorageError::from)?;

    let mut entry = Entry::new(
        clock.mint_id(),
        clock.today_local_ymd(),
        clock.time_hhmm(),
        EntryType::Rule,
        Vec::new(),
        content.to_string(),
        Some(Tier::LongTerm),
    );
    entry.label = Some(label.to_string());
    entry.pinned = true;

    super::entry_crud::insert(conn, &entry)?;
    Ok(entry)
}

pub fn delete_rule(conn: &Connection, label: &str) -> MemexResult<bool> {
    let n = conn
        .execute(
            "DELETE FROM entries WHERE entry_type = 'rule' AND label = ?1",
            params![label],
        )
        .map_err(StorageError::from)?;
    Ok(n > 0)
}

pub fn list_rules(conn: &Connection) -> MemexResult<Vec<Entry>> {
    let sql = format!(
        "{} WHERE entry_type = 'rule' AND archived = 0 ORDER BY date DESC, time DESC",
        super::entry_crud::SELECT_ENTRY
    );
    let mut stmt = conn.prepare(&sql).map_err(StorageError::from)?;
    let rows = stmt
        .query_map([], super::entry_crud::row_to_entry)
        .map_err(StorageError::from)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(StorageError::from)?);
    }
    Ok(out)
}
