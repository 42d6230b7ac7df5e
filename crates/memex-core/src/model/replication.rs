use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static identity of this host within the replication protocol (§3.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicationConfig {
    pub machine_id: String,
    pub machine_name: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub enabled: bool,
}

/// Persisted at `<base>/sync/state.json` (§3.6, §6.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicationState {
    pub config: ReplicationConfig,
    pub last_push_at: Option<DateTime<Utc>>,
    pub last_pull_at: Option<DateTime<Utc>>,
    pub remote_cursors: BTreeMap<String, u64>,
}

impl ReplicationState {
    pub fn new(config: ReplicationConfig) -> Self {
        ReplicationState {
            config,
            last_push_at: None,
            last_pull_at: None,
            remote_cursors: BTreeMap::new(),
        }
    }

    pub fn cursor_for(&self, machine_id: &str) -> u64 {
        self.remote_cursors.get(machine_id).copied().unwrap_or(0)
    }
}
