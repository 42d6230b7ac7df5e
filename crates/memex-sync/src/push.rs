//! Push (§4.7): select locally-changed entries, append unseen ones to the
//! cached mirror of this host's own log, then upload the whole cache with
//! an optimistic version check.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};

use memex_core::errors::{MemexResult, ValidationError};
use memex_core::Entry;
use memex_storage::queries::entry_crud::ListFilter;
use memex_storage::StorageEngine;

use crate::blob_store::BlobStore;
use crate::record::SyncRecord;

#[derive(Debug, Default)]
pub struct PushReport {
    pub pushed: usize,
}

/// `datetime(date, time)` per §4.7: entries carry no explicit timezone, so
/// (as with the rest of the engine's host-local timestamps, §4.8) the
/// combined value is compared against `last_push_at` as if it were UTC.
fn entry_datetime_utc(entry: &Entry) -> DateTime<Utc> {
    let time = NaiveTime::parse_from_str(&entry.time, "%H:%M").unwrap_or(NaiveTime::MIN);
    let naive = NaiveDateTime::new(entry.date, time);
    DateTime::from_naive_utc_and_offset(naive, Utc)
}

pub fn push(
    store: &StorageEngine,
    object_store: &dyn BlobStore,
    machine_id: &str,
    cache_dir: &Path,
    last_push_at: Option<DateTime<Utc>>,
    today: chrono::NaiveDate,
) -> MemexResult<(PushReport, DateTime<Utc>)> {
    let candidates = store.list(ListFilter {
        entry_type: None,
        days: None,
        include_archived: false,
        today,
    })?;

    let selected: Vec<&Entry> = candidates
        .iter()
        .filter(|e| last_push_at.map(|cutoff| entry_datetime_utc(e) > cutoff).unwrap_or(true))
        .collect();

    let cache_path = cache_dir.join(format!("{machine_id}.jsonl"));
    let cache_text = std::fs::read_to_string(&cache_path).unwrap_or_default();
    let mut cached_ids: HashSet<String> = HashSet::new();
    let mut lines: Vec<String> = Vec::new();
    for line in cache_text.lines() {
        if let Ok(record) = serde_json::from_str::<SyncRecord>(line) {
            cached_ids.insert(record.id.clone());
        }
        lines.push(line.to_string());
    }

    let mut pushed = 0usize;
    for entry in &selected {
        if cached_ids.contains(&entry.id) {
            continue;
        }
        let record = SyncRecord::from(*entry);
        let line = serde_json::to_string(&record).map_err(|e| ValidationError::InvalidConfig(e.to_string()))?;
        lines.push(line);
        cached_ids.insert(entry.id.clone());
        pushed += 1;
    }

    let cache_contents = lines.join("\n");
    let cache_contents = if cache_contents.is_empty() {
        cache_contents
    } else {
        format!("{cache_contents}\n")
    };
    std::fs::write(&cache_path, &cache_contents).map_err(|e| ValidationError::InvalidPath(e.to_string()))?;

    let remote_key = format!("entries/{machine_id}.jsonl");
    let expected_version = object_store.get(&remote_key)?.map(|b| b.version);
    object_store.put(&remote_key, cache_contents.as_bytes(), expected_version.as_deref())?;

    Ok((PushReport { pushed }, Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob_store::fake::InMemoryBlobStore;
    use chrono::NaiveDate;
    use memex_core::EntryType;

    #[test]
    fn push_uploads_all_unarchived_entries_when_last_push_at_is_none() {
        let (store, _guard) = StorageEngine::open_temp().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let entry = Entry::new(
            "abc123".to_string(),
            today,
            "09:00".to_string(),
            EntryType::Decision,
            vec![],
            "some content".to_string(),
            None,
        );
        store.insert(&entry).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let object_store = InMemoryBlobStore::default();
        let (report, _) = push(&store, &object_store, "m1", dir.path(), None, today).unwrap();
        assert_eq!(report.pushed, 1);

        let blob = object_store.get("entries/m1.jsonl").unwrap().unwrap();
        assert!(String::from_utf8(blob.bytes).unwrap().contains("abc123"));
    }

    #[test]
    fn push_is_idempotent_for_already_cached_entries() {
        let (store, _guard) = StorageEngine::open_temp().unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let entry = Entry::new(
            "abc123".to_string(),
            today,
            "09:00".to_string(),
            EntryType::Decision,
            vec![],
            "some content".to_string(),
            None,
        );
        store.insert(&entry).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let object_store = InMemoryBlobStore::default();
        push(&store, &object_store, "m1", dir.path(), None, today).unwrap();
        let (second, _) = push(&store, &object_store, "m1", dir.path(), None, today).unwrap();
        assert_eq!(second.pushed, 0);
    }
}
