//! Pull (§4.7): fetch every other host's log, skip already-seen lines via
//! `remote_cursors`, and insert entries this store doesn't already have.

use std::collections::BTreeMap;

use chrono::Utc;
use chrono::DateTime;

use memex_core::errors::MemexResult;
use memex_embed::EmbeddingEngine;
use memex_storage::StorageEngine;

use crate::blob_store::BlobStore;
use crate::record::SyncRecord;

#[derive(Debug, Default)]
pub struct PullReport {
    pub pulled: usize,
    pub embedding_failures: usize,
}

pub fn pull(
    store: &StorageEngine,
    embed: &EmbeddingEngine,
    object_store: &dyn BlobStore,
    self_machine_id: &str,
    remote_cursors: &mut BTreeMap<String, u64>,
) -> MemexResult<(PullReport, DateTime<Utc>)> {
    let mut report = PullReport::default();

    let keys = object_store.list("entries/")?;
    for key in keys {
        let Some(machine_id) = key.strip_prefix("entries/").and_then(|s| s.strip_suffix(".jsonl")) else {
            continue;
        };
        if machine_id == self_machine_id {
            continue;
        }

        let Some(blob) = object_store.get(&key)? else {
            continue;
        };
        let text = String::from_utf8_lossy(&blob.bytes);
        let lines: Vec<&str> = text.lines().collect();

        let skip = remote_cursors.get(machine_id).copied().unwrap_or(0) as usize;
        for line in lines.iter().skip(skip) {
            if line.trim().is_empty() {
                continue;
            }
            let Ok(record) = serde_json::from_str::<SyncRecord>(line) else {
                continue;
            };
            if store.has_entry(&record.id)? {
                continue;
            }

            let entry = record.into_entry();
            let row_id = store.insert(&entry)?;
            report.pulled += 1;

            let v = embed.embed(&entry.content);
            if store.insert_vec(row_id, &v).is_err() {
                report.embedding_failures += 1;
            }
        }

        remote_cursors.insert(machine_id.to_string(), lines.len() as u64);
    }

    Ok((report, Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob_store::fake::InMemoryBlobStore;
    use crate::blob_store::BlobStore as _;
    use chrono::NaiveDate;
    use memex_core::{Entry, EntryType};

    #[test]
    fn pull_inserts_unseen_remote_entries_and_advances_cursor() {
        let (store, _guard) = StorageEngine::open_temp().unwrap();
        let embed = EmbeddingEngine::with_local_backend();
        let object_store = InMemoryBlobStore::default();

        let record = SyncRecord::from(&Entry::new(
            "remote01".to_string(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            "09:00".to_string(),
            EntryType::Decision,
            vec![],
            "a remote decision".to_string(),
            None,
        ));
        let line = serde_json::to_string(&record).unwrap();
        object_store.put("entries/other-host.jsonl", format!("{line}\n").as_bytes(), None).unwrap();

        let mut cursors = BTreeMap::new();
        let (report, _) = pull(&store, &embed, &object_store, "self-host", &mut cursors).unwrap();

        assert_eq!(report.pulled, 1);
        assert!(store.has_entry("remote01").unwrap());
        assert_eq!(cursors.get("other-host"), Some(&1));
    }

    #[test]
    fn pull_skips_entries_already_covered_by_cursor() {
        let (store, _guard) = StorageEngine::open_temp().unwrap();
        let embed = EmbeddingEngine::with_local_backend();
        let object_store = InMemoryBlobStore::default();

        let record = SyncRecord::from(&Entry::new(
            "remote02".to_string(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            "09:00".to_string(),
            EntryType::Decision,
            vec![],
            "already seen".to_string(),
            None,
        ));
        let line = serde_json::to_string(&record).unwrap();
        object_store.put("entries/other-host.jsonl", format!("{line}\n").as_bytes(), None).unwrap();

        let mut cursors = BTreeMap::new();
        cursors.insert("other-host".to_string(), 1);
        let (report, _) = pull(&store, &embed, &object_store, "self-host", &mut cursors).unwrap();

        assert_eq!(report.pulled, 0);
        assert!(!store.has_entry("remote02").unwrap());
    }
}
