use serde::{Deserialize, Serialize};

use super::defaults;

/// Transcript scanner configuration (§4.6, §5 backpressure).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    pub max_chunk_bytes: usize,
    pub max_messages_per_scan: usize,
    pub directory: Option<String>,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            max_chunk_bytes: defaults::DEFAULT_MAX_CHUNK_BYTES,
            max_messages_per_scan: defaults::DEFAULT_MAX_MESSAGES_PER_SCAN,
            directory: None,
        }
    }
}
