//! `status()` (§4.1): aggregate counters for session-start reporting and
//! operational visibility, following
//! `cortex-observability`'s `HealthSnapshot`/`HealthReport`
//! worst-of-status aggregation idiom
//! (`cortex-observability::health::reporter`), simplified to the plain
//! counter set this component tracks.

use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::BTreeMap;

use memex_core::errors::{MemexResult, StorageError};

#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageStatus {
    pub total: u64,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub tier_distribution: BTreeMap<String, u64>,
    pub archived_count: u64,
    pub active_patterns: u64,
    pub storage_bytes: u64,
}

pub fn status(conn: &Connection, db_path: Option<&std::path::Path>) -> MemexResult<StorageStatus> {
    let total: i64 = conn
        .query_row("SELECT COUNT(1) FROM entries", [], |r| r.get(0))
        .map_err(StorageError::from)?;

    let archived_count: i64 = conn
        .query_row("SELECT COUNT(1) FROM entries WHERE archived = 1", [], |r| r.get(0))
        .map_err(StorageError::from)?;

    let active_patterns: i64 = conn
        .query_row(
            "SELECT COUNT(1) FROM patterns WHERE resolved = 0 AND occurrence_count >= 3",
            [],
            |r| r.get(0),
        )
        .map_err(StorageError::from)?;

    let (min_date, max_date): (Option<String>, Option<String>) = conn
        .query_row("SELECT MIN(date), MAX(date) FROM entries", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .map_err(StorageError::from)?;
    let date_range = min_date.zip(max_date).and_then(|(min, max)| {
        Some((
            NaiveDate::parse_from_str(&min, "%Y-%m-%d").ok()?,
            NaiveDate::parse_from_str(&max, "%Y-%m-%d").ok()?,
        ))
    });

    let mut tier_distribution = BTreeMap::new();
    let mut stmt = conn
        .prepare("SELECT tier, COUNT(1) FROM entries GROUP BY tier")
        .map_err(StorageError::from)?;
    let rows = stmt
        .query_map([], |row| {
            let tier: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((tier, count as u64))
        })
        .map_err(StorageError::from)?;
    for r in rows {
        let (tier, count) = r.map_err(StorageError::from)?;
        tier_distribution.insert(tier, count);
    }

    let storage_bytes = db_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(StorageStatus {
        total: total as u64,
        date_range,
        tier_distribution,
        archived_count: archived_count as u64,
        active_patterns: active_patterns as u64,
        storage_bytes,
    })
}
