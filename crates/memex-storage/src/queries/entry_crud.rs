//! Insert, get, list, archive, access-bump, and clear operations on entries
//! (§4.1).

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use memex_core::errors::{MemexResult, StorageError};
use memex_core::{Entry, EntryType, Tier};

/// Upsert by `id`. Returns the internal row identifier. Replacement
/// preserves no lexical or vector state for that row (§4.1): the FTS5
/// triggers re-derive the lexical side automatically, but the caller is
/// responsible for recomputing and re-attaching a vector afterward.
pub fn insert(conn: &Connection, entry: &Entry) -> MemexResult<i64> {
    let tags_json = serde_json::to_string(&entry.tags).map_err(|e| StorageError::Corrupted {
        details: e.to_string(),
    })?;

    conn.execute(
        "INSERT INTO entries (
            id, date, time, entry_type, tags, content, source_file, tier,
            access_count, last_accessed, pinned, archived, label, project,
            session_id, agent_id
        ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16)
        ON CONFLICT(id) DO UPDATE SET
            date = excluded.date,
            time = excluded.time,
            entry_type = excluded.entry_type,
            tags = excluded.tags,
            content = excluded.content,
            source_file = excluded.source_file,
            tier = excluded.tier,
            access_count = excluded.access_count,
            last_accessed = excluded.last_accessed,
            pinned = excluded.pinned,
            archived = excluded.archived,
            label = excluded.label,
            project = excluded.project,
            session_id = excluded.session_id,
            agent_id = excluded.agent_id",
        params![
            entry.id,
            entry.date.to_string(),
            entry.time,
            entry.entry_type.as_str(),
            tags_json,
            entry.content,
            entry.source_file,
            entry.tier.as_str(),
            entry.access_count,
            entry.last_accessed.map(|d| d.to_string()),
            entry.pinned as i32,
            entry.archived as i32,
            entry.label,
            entry.project,
            entry.session_id,
            entry.agent_id,
        ],
    )
    .map_err(StorageError::from)?;

    let row_id: i64 = conn
        .query_row("SELECT rowid FROM entries WHERE id = ?1", params![entry.id], |r| r.get(0))
        .map_err(StorageError::from)?;

    // §4.1: "Replacement preserves no lexical or vector state; the caller
    // re-computes any needed vector." The FTS5 triggers already re-derive
    // the lexical side on UPDATE; the vector side has no such trigger, so
    // any stale vector at this row is dropped here.
    conn.execute("DELETE FROM entry_vectors WHERE row_id = ?1", params![row_id])
        .map_err(StorageError::from)?;

    Ok(row_id)
}

pub fn get_by_id(conn: &Connection, id: &str) -> MemexResult<Option<Entry>> {
    conn.query_row(
        &format!("{} WHERE id = ?1", SELECT_ENTRY),
        params![id],
        row_to_entry,
    )
    .optional()
    .map_err(StorageError::from)
    .map_err(Into::into)
}

pub fn get_by_rowids(conn: &Connection, row_ids: &[i64]) -> MemexResult<Vec<Entry>> {
    if row_ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = row_ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let sql = format!("{} WHERE rowid IN ({})", SELECT_ENTRY, placeholders);
    let mut stmt = conn.prepare(&sql).map_err(StorageError::from)?;
    let params: Vec<&dyn rusqlite::ToSql> =
        row_ids.iter().map(|i| i as &dyn rusqlite::ToSql).collect();
    let rows = stmt
        .query_map(params.as_slice(), row_to_entry)
        .map_err(StorageError::from)?;
    let mut out = Vec::with_capacity(row_ids.len());
    for r in rows {
        out.push(r.map_err(StorageError::from)?);
    }
    Ok(out)
}

pub struct ListFilter {
    pub entry_type: Option<EntryType>,
    pub days: Option<i64>,
    pub include_archived: bool,
    pub today: NaiveDate,
}

/// `list({type?, days?, include_archived}) -> entries` ordered by
/// `(date desc, time desc)` (§4.1).
pub fn list(conn: &Connection, filter: &ListFilter) -> MemexResult<Vec<Entry>> {
    let mut sql = format!("{} WHERE 1=1", SELECT_ENTRY);
    let mut bound: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
    if !filter.include_archived {
        sql.push_str(" AND archived = 0");
    }
    if let Some(t) = filter.entry_type {
        bound.push(Box::new(t.as_str().to_string()));
        sql.push_str(&format!(" AND entry_type = ?{}", bound.len()));
    }
    if let Some(days) = filter.days {
        // Open question resolution (§9): inclusive cutoff `date >= today - days + 1`.
        let cutoff = filter.today - chrono::Duration::days((days - 1).max(0));
        bound.push(Box::new(cutoff.to_string()));
        sql.push_str(&format!(" AND date >= ?{}", bound.len()));
    }
    sql.push_str(" ORDER BY date DESC, time DESC");

    let mut stmt = conn.prepare(&sql).map_err(StorageError::from)?;
    let bound_refs: Vec<&dyn rusqlite::ToSql> = bound.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(bound_refs.as_slice(), row_to_entry).map_err(StorageError::from)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(StorageError::from)?);
    }
    Ok(out)
}

/// Same filters as `list`, but additionally reports each row's internal
/// rowid, needed by consolidation to look up vectors for clustering (§4.4
/// step 5).
pub fn list_with_rowids(conn: &Connection, filter: &ListFilter) -> MemexResult<Vec<(i64, Entry)>> {
    let mut sql = "SELECT rowid, id, date, time, entry_type, tags, content, source_file, tier, \
         access_count, last_accessed, pinned, archived, label, project, session_id, agent_id \
         FROM entries WHERE 1=1"
        .to_string();
    let mut bound: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
    if !filter.include_archived {
        sql.push_str(" AND archived = 0");
    }
    if let Some(t) = filter.entry_type {
        bound.push(Box::new(t.as_str().to_string()));
        sql.push_str(&format!(" AND entry_type = ?{}", bound.len()));
    }
    if let Some(days) = filter.days {
        let cutoff = filter.today - chrono::Duration::days((days - 1).max(0));
        bound.push(Box::new(cutoff.to_string()));
        sql.push_str(&format!(" AND date >= ?{}", bound.len()));
    }
    sql.push_str(" ORDER BY date DESC, time DESC");

    let mut stmt = conn.prepare(&sql).map_err(StorageError::from)?;
    let bound_refs: Vec<&dyn rusqlite::ToSql> = bound.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(bound_refs.as_slice(), row_with_rowid).map_err(StorageError::from)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(StorageError::from)?);
    }
    Ok(out)
}

/// Sets `archived=true` only for rows with `pinned=false`; returns the
/// number actually changed (§4.1, idempotence property in §8).
pub fn archive(conn: &Connection, ids: &[String]) -> MemexResult<usize> {
    let mut changed = 0;
    for id in ids {
        let n = conn
            .execute(
                "UPDATE entries SET archived = 1 WHERE id = ?1 AND pinned = 0 AND archived = 0",
                params![id],
            )
            .map_err(StorageError::from)?;
        changed += n;
    }
    Ok(changed)
}

/// Change just `tier`, leaving lexical/vector state untouched. Used by
/// maintenance's demote/promote steps (§4.4), which never change content.
pub fn update_tier(conn: &Connection, id: &str, tier: Tier) -> MemexResult<()> {
    conn.execute(
        "UPDATE entries SET tier = ?2 WHERE id = ?1",
        params![id, tier.as_str()],
    )
    .map_err(StorageError::from)?;
    Ok(())
}

/// Merge tags/content into a survivor row and, if requested, promote its
/// tier, without touching its vector (§4.4 step 5 consolidation). The FTS5
/// triggers re-derive the lexical index automatically on this UPDATE.
pub fn consolidate_into_survivor(
    conn: &Connection,
    id: &str,
    tags: &[String],
    content: &str,
    tier: Tier,
) -> MemexResult<()> {
    let tags_json = serde_json::to_string(tags).map_err(|e| StorageError::Corrupted {
        details: e.to_string(),
    })?;
    conn.execute(
        "UPDATE entries SET tags = ?2, content = ?3, tier = ?4 WHERE id = ?1",
        params![id, tags_json, content, tier.as_str()],
    )
    .map_err(StorageError::from)?;
    Ok(())
}

/// For each id: `access_count += 1`, `last_accessed = today`.
pub fn bump_access(conn: &Connection, ids: &[String], today: NaiveDate) -> MemexResult<()> {
    for id in ids {
        conn.execute(
            "UPDATE entries SET access_count = access_count + 1, last_accessed = ?2 WHERE id = ?1",
            params![id, today.to_string()],
        )
        .map_err(StorageError::from)?;
    }
    Ok(())
}

pub fn find_by_tag(conn: &Connection, tag: &str) -> MemexResult<Vec<Entry>> {
    let sql = format!("{} WHERE archived = 0", SELECT_ENTRY);
    let mut stmt = conn.prepare(&sql).map_err(StorageError::from)?;
    let rows = stmt.query_map([], row_to_entry).map_err(StorageError::from)?;
    let mut out = Vec::new();
    for r in rows {
        let entry = r.map_err(StorageError::from)?;
        if entry.tags.iter().any(|t| t == tag) {
            out.push(entry);
        }
    }
    Ok(out)
}

pub fn has_entry_with_tag(conn: &Connection, tag: &str) -> MemexResult<bool> {
    Ok(!find_by_tag(conn, tag)?.is_empty())
}

pub fn list_by_session(conn: &Connection, session_id: &str) -> MemexResult<Vec<Entry>> {
    let sql = format!(
        "{} WHERE session_id = ?1 AND archived = 0 ORDER BY date DESC, time DESC",
        SELECT_ENTRY
    );
    let mut stmt = conn.prepare(&sql).map_err(StorageError::from)?;
    let rows = stmt
        .query_map(params![session_id], row_to_entry)
        .map_err(StorageError::from)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(StorageError::from)?);
    }
    Ok(out)
}

pub fn has_entry(conn: &Connection, id: &str) -> MemexResult<bool> {
    let count: i64 = conn
        .query_row("SELECT COUNT(1) FROM entries WHERE id = ?1", params![id], |r| r.get(0))
        .map_err(StorageError::from)?;
    Ok(count > 0)
}

/// Wipes entries, vectors, patterns, and file pairs; preserves schema.
pub fn clear_all(conn: &Connection) -> MemexResult<()> {
    conn.execute_batch(
        "
        DELETE FROM entries;
        DELETE FROM entry_vectors;
        DELETE FROM patterns;
        DELETE FROM pattern_entries;
        DELETE FROM file_pairs;
        INSERT INTO entries_fts(entries_fts) VALUES ('rebuild');
        ",
    )
    .map_err(StorageError::from)?;
    Ok(())
}

pub(crate) const SELECT_ENTRY: &str = "SELECT id, date, time, entry_type, tags, content, \
     source_file, tier, access_count, last_accessed, pinned, archived, label, project, \
     session_id, agent_id FROM entries";

/// Row mapper for queries that additionally select `rowid` as column 0
/// (used by lexical and vector search, which must report row ids back to
/// the ranker for RRF fusion).
pub(crate) fn row_with_rowid(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, Entry)> {
    use std::str::FromStr;

    let row_id: i64 = row.get(0)?;
    let date_str: String = row.get(2)?;
    let entry_type_str: String = row.get(4)?;
    let tags_json: String = row.get(5)?;
    let tier_str: String = row.get(8)?;
    let last_accessed_str: Option<String> = row.get(10)?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_default();
    let entry_type = EntryType::from_str(&entry_type_str).unwrap_or(EntryType::Insight);
    let tags: Vec<String> = serde_json::from_str(&tags_json).unwrap_or_default();
    let tier = Tier::from_str(&tier_str).unwrap_or(Tier::Working);
    let last_accessed =
        last_accessed_str.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());

    Ok((
        row_id,
        Entry {
            id: row.get(1)?,
            date,
            time: row.get(3)?,
            entry_type,
            tags,
            content: row.get(6)?,
            source_file: row.get(7)?,
            tier,
            access_count: row.get::<_, i64>(9)? as u64,
            last_accessed,
            pinned: row.get::<_, i32>(11)? != 0,
            archived: row.get::<_, i32>(12)? != 0,
            label: row.get(13)?,
            project: row.get(14)?,
            session_id: row.get(15)?,
            agent_id: row.get(16)?,
        },
    ))
}

pub(crate) fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<Entry> {
    use std::str::FromStr;

    let date_str: String = row.get(1)?;
    let entry_type_str: String = row.get(3)?;
    let tags_json: String = row.get(4)?;
    let tier_str: String = row.get(7)?;
    let last_accessed_str: Option<String> = row.get(9)?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_default();
    let entry_type = EntryType::from_str(&entry_type_str).unwrap_or(EntryType::Insight);
    let tags: Vec<String> = serde_json::from_str(&tags_json).unwrap_or_default();
    let tier = Tier::from_str(&tier_str).unwrap_or(Tier::Working);
    let last_accessed = last_accessed_str
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());

    Ok(Entry {
        id: row.get(0)?,
        date,
        time: row.get(2)?,
        entry_type,
        tags,
        content: row.get(5)?,
        source_file: row.get(6)?,
        tier,
        access_count: row.get::<_, i64>(8)? as u64,
        last_accessed,
        pinned: row.get::<_, i32>(10)? != 0,
        archived: row.get::<_, i32>(11)? != 0,
        label: row.get(12)?,
        project: row.get(13)?,
        session_id: row.get(14)?,
        agent_id: row.get(15)?,
    })
}
