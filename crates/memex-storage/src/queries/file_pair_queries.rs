//! Co-change tracking (§3.4, §4.5).

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use memex_core::errors::{MemexResult, StorageError};
use memex_core::FilePair;

/// Increments `co_change_count` or inserts with count 1, updating
/// `last_seen`. `file_a`/`file_b` are stored in the order observed.
pub fn upsert_file_pair(
    conn: &Connection,
    project: &str,
    file_a: &str,
    file_b: &str,
    today: NaiveDate,
) -> MemexResult<()> {
    conn.execute(
        "INSERT INTO file_pairs (project, file_a, file_b, co_change_count, last_seen)
         VALUES (?1, ?2, ?3, 1, ?4)
         ON CONFLICT(project, file_a, file_b) DO UPDATE SET
            co_change_count = co_change_count + 1,
            last_seen = excluded.last_seen",
        params![project, file_a, file_b, today.to_string()],
    )
    .map_err(StorageError::from)?;
    Ok(())
}

/// Files paired with `file`, ordered by count desc.
pub fn get_cochanges(
    conn: &Connection,
    project: &str,
    file: &str,
    limit: usize,
) -> MemexResult<Vec<FilePair>> {
    let mut stmt = conn
        .prepare(
            "SELECT project, file_a, file_b, co_change_count, last_seen FROM file_pairs
             WHERE project = ?1 AND (file_a = ?2 OR file_b = ?2)
             ORDER BY co_change_count DESC LIMIT ?3",
        )
        .map_err(StorageError::from)?;
    let rows = stmt
        .query_map(params![project, file, limit as i64], |row| {
            let last_seen: String = row.get(4)?;
            Ok(FilePair {
                project: row.get(0)?,
                file_a: row.get(1)?,
                file_b: row.get(2)?,
                co_change_count: row.get::<_, i64>(3)? as u64,
                last_seen: NaiveDate::parse_from_str(&last_seen, "%Y-%m-%d").unwrap_or_default(),
            })
        })
        .map_err(StorageError::from)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(StorageError::from)?);
    }
    Ok(out)
}
