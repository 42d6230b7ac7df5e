//! Lexical (BM25/FTS5) search (§4.1).

use chrono::NaiveDate;
use rusqlite::Connection;

use memex_core::errors::{MemexResult, StorageError};
use memex_core::EntryType;

pub struct LexicalFilter {
    pub entry_type: Option<EntryType>,
    pub days: Option<i64>,
    pub include_archived: bool,
    pub today: NaiveDate,
}

/// `search_lexical(query, {type?, days?, limit, include_archived}) -> entries
/// ordered by BM25 rank` (§4.1). Returns `(row_id, entry)` pairs so callers
/// (the ranker) can fuse against the vector index by row id.
pub fn search_lexical(
    conn: &Connection,
    query: &str,
    limit: usize,
    filter: &LexicalFilter,
) -> MemexResult<Vec<(i64, memex_core::Entry)>> {
    if query.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut sql = format!("{} WHERE entries_fts MATCH ?1", SELECT_WITH_ROWID);
    let mut bound: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(fts5_query(query))];

    if !filter.include_archived {
        sql.push_str(" AND e.archived = 0");
    }
    if let Some(t) = filter.entry_type {
        bound.push(Box::new(t.as_str().to_string()));
        sql.push_str(&format!(" AND e.entry_type = ?{}", bound.len()));
    }
    if let Some(days) = filter.days {
        let cutoff = filter.today - chrono::Duration::days((days - 1).max(0));
        bound.push(Box::new(cutoff.to_string()));
        sql.push_str(&format!(" AND e.date >= ?{}", bound.len()));
    }
    bound.push(Box::new(limit as i64));
    sql.push_str(&format!(" ORDER BY rank LIMIT ?{}", bound.len()));

    let mut stmt = conn.prepare(&sql).map_err(StorageError::from)?;
    let bound_refs: Vec<&dyn rusqlite::ToSql> = bound.iter().map(|p| p.as_ref()).collect();
    let rows = stmt
        .query_map(bound_refs.as_slice(), super::entry_crud::row_with_rowid)
        .map_err(StorageError::from)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(StorageError::from)?);
    }
    Ok(out)
}

/// FTS5 MATCH treats bare input as query syntax (`AND`, `-`, `"`, …); quote
/// the whole phrase so arbitrary free text never throws a syntax error.
fn fts5_query(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "\"\""))
}

const SELECT_WITH_ROWID: &str = "SELECT e.rowid, e.id, e.date, e.time, e.entry_type, e.tags, \
     e.content, e.source_file, e.tier, e.access_count, e.last_accessed, e.pinned, e.archived, \
     e.label, e.project, e.session_id, e.agent_id \
     FROM entries e JOIN entries_fts fts ON fts.rowid = e.rowid";
