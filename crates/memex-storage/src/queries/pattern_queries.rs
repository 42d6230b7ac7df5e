//! Pattern lifecycle queries (§3.3, §4.5).

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::collections::BTreeSet;

use memex_core::errors::{MemexResult, StorageError};
use memex_core::Pattern;

/// Scan unresolved patterns; if any overlaps `entry_ids` by at least one id,
/// merge and return its id. Else create a new pattern with a fresh id
/// (§4.5 `create_or_update_pattern`).
pub fn create_or_update_pattern(
    conn: &Connection,
    new_id: String,
    label: &str,
    entry_ids: &BTreeSet<String>,
    today: NaiveDate,
) -> MemexResult<String> {
    let unresolved = list_unresolved(conn)?;
    for mut pattern in unresolved {
        if pattern.entry_ids.intersection(entry_ids).next().is_some() {
            pattern.merge(label, entry_ids, today);
            save(conn, &pattern)?;
            return Ok(pattern.id);
        }
    }

    let pattern = Pattern::new(new_id.clone(), label.to_string(), entry_ids.clone(), today);
    save(conn, &pattern)?;
    Ok(new_id)
}

/// Unresolved, `occurrence_count >= 3`, ordered by `last_seen desc`.
pub fn get_active_patterns(conn: &Connection) -> MemexResult<Vec<Pattern>> {
    Ok(list_unresolved(conn)?
        .into_iter()
        .filter(|p| p.is_active())
        .collect())
}

pub fn resolve_pattern(conn: &Connection, id: &str) -> MemexResult<bool> {
    let n = conn
        .execute("UPDATE patterns SET resolved = 1 WHERE id = ?1", params![id])
        .map_err(StorageError::from)?;
    Ok(n > 0)
}

/// Linear scan of unresolved patterns; returns the first match (§4.5,
/// §9 "first-match-wins by scan order").
pub fn get_pattern_for_entry(conn: &Connection, entry_id: &str) -> MemexResult<Option<Pattern>> {
    Ok(list_unresolved(conn)?
        .into_iter()
        .find(|p| p.entry_ids.contains(entry_id)))
}

fn list_unresolved(conn: &Connection) -> MemexResult<Vec<Pattern>> {
    let mut stmt = conn
        .prepare("SELECT id, label, occurrence_count, first_seen, last_seen FROM patterns WHERE resolved = 0")
        .map_err(StorageError::from)?;
    let rows = stmt
        .query_map([], |row| {
            let id: String = row.get(0)?;
            let label: String = row.get(1)?;
            let occurrence_count: i64 = row.get(2)?;
            let first_seen: String = row.get(3)?;
            let last_seen: String = row.get(4)?;
            Ok((id, label, occurrence_count, first_seen, last_seen))
        })
        .map_err(StorageError::from)?;

    let mut patterns = Vec::new();
    for r in rows {
        let (id, label, occurrence_count, first_seen, last_seen) = r.map_err(StorageError::from)?;
        let entry_ids = load_entry_ids(conn, &id)?;
        patterns.push(Pattern {
            id,
            label,
            entry_ids,
            occurrence_count: occurrence_count as u64,
            first_seen: NaiveDate::parse_from_str(&first_seen, "%Y-%m-%d").unwrap_or_default(),
            last_seen: NaiveDate::parse_from_str(&last_seen, "%Y-%m-%d").unwrap_or_default(),
            resolved: false,
        });
    }
    // Ordered by last_seen desc for get_active_patterns; harmless elsewhere.
    patterns.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
    Ok(patterns)
}

fn load_entry_ids(conn: &Connection, pattern_id: &str) -> MemexResult<BTreeSet<String>> {
    let mut stmt = conn
        .prepare("SELECT entry_id FROM pattern_entries WHERE pattern_id = ?1")
        .map_err(StorageError::from)?;
    let rows = stmt
        .query_map(params![pattern_id], |r| r.get::<_, String>(0))
        .map_err(StorageError::from)?;
    let mut out = BTreeSet::new();
    for r in rows {
        out.insert(r.map_err(StorageError::from)?);
    }
    Ok(out)
}

fn save(conn: &Connection, pattern: &Pattern) -> MemexResult<()> {
    conn.execute(
        "INSERT INTO patterns (id, label, occurrence_count, first_seen, last_seen, resolved)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            label = excluded.label,
            occurrence_count = excluded.occurrence_count,
            last_seen = excluded.last_seen,
            resolved = excluded.resolved",
        params![
            pattern.id,
            pattern.label,
            pattern.occurrence_count,
            pattern.first_seen.to_string(),
            pattern.last_seen.to_string(),
            pattern.resolved as i32,
        ],
    )
    .map_err(StorageError::from)?;

    conn.execute("DELETE FROM pattern_entries WHERE pattern_id = ?1", params![pattern.id])
        .map_err(StorageError::from)?;
    for entry_id in &pattern.entry_ids {
        conn.execute(
            "INSERT OR IGNORE INTO pattern_entries (pattern_id, entry_id) VALUES (?1, ?2)",
            params![pattern.id, entry_id],
        )
        .map_err(StorageError::from)?;
    }
    Ok(())
}
