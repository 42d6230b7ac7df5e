//! The wire record written per line of `entries/{machine_id}.jsonl` (§6.4).
//! Strips provenance and per-host-derived fields (`source_file`,
//! `access_count`, `last_accessed`, `archived`) — only the fields §6.4
//! names are ever synced; embeddings are never synced.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use memex_core::{Entry, EntryType, Tier};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRecord {
    pub id: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub tags: Vec<String>,
    pub content: String,
    pub tier: Tier,
    pub pinned: bool,
    pub project: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
    #[serde(rename = "agentId")]
    pub agent_id: Option<String>,
}

impl From<&Entry> for SyncRecord {
    fn from(entry: &Entry) -> Self {
        SyncRecord {
            id: entry.id.clone(),
            date: entry.date,
            time: entry.time.clone(),
            entry_type: entry.entry_type,
            tags: entry.tags.clone(),
            content: entry.content.clone(),
            tier: entry.tier,
            pinned: entry.pinned,
            project: entry.project.clone(),
            session_id: entry.session_id.clone(),
            agent_id: entry.agent_id.clone(),
        }
    }
}

impl SyncRecord {
    /// Rehydrate a local `Entry` from a pulled record (§4.7 "Pull"):
    /// `source_file="sync"`, never archived, access_count/last_accessed
    /// reset since they are this host's derived fields, not the remote's.
    pub fn into_entry(self) -> Entry {
        Entry {
            id: self.id,
            date: self.date,
            time: self.time,
            entry_type: self.entry_type,
            tags: self.tags,
            content: self.content,
            source_file: Some("sync".to_string()),
            tier: self.tier,
            access_count: 0,
            last_accessed: None,
            pinned: self.pinned,
            archived: false,
            label: None,
            project: self.project,
            session_id: self.session_id,
            agent_id: self.agent_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn record_roundtrips_and_strips_provenance() {
        let mut entry = Entry::new(
            "abc123".to_string(),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            "09:00".to_string(),
            EntryType::Decision,
            vec!["tag".to_string()],
            "some content".to_string(),
            None,
        );
        entry.source_file = Some("cli".to_string());
        entry.access_count = 5;

        let record = SyncRecord::from(&entry);
        let json = serde_json::to_string(&record).unwrap();
        let back: SyncRecord = serde_json::from_str(&json).unwrap();
        let rehydrated = back.into_entry();

        assert_eq!(rehydrated.id, entry.id);
        assert_eq!(rehydrated.source_file, Some("sync".to_string()));
        assert_eq!(rehydrated.access_count, 0);
    }
}
