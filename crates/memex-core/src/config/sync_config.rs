use serde::{Deserialize, Serialize};

use super::defaults;

/// Replicator scheduling configuration (§4.7, §5 concurrency).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub tick_seconds: u64,
    pub payload_cap_bytes: usize,
    pub object_store_timeout_seconds: u64,
    pub base_url: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tick_seconds: defaults::DEFAULT_TICK_SECONDS,
            payload_cap_bytes: defaults::DEFAULT_PAYLOAD_CAP_BYTES,
            object_store_timeout_seconds: defaults::DEFAULT_OBJECT_STORE_TIMEOUT_SECONDS,
            base_url: None,
        }
    }
}
