use serde::{Deserialize, Serialize};

use super::defaults;

/// Store subsystem configuration (§4.1 durability, §5 concurrency).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub busy_timeout_ms: u32,
    pub mmap_size_bytes: i64,
    pub cache_size_kib: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: defaults::DEFAULT_BUSY_TIMEOUT_MS,
            mmap_size_bytes: defaults::DEFAULT_MMAP_SIZE,
            cache_size_kib: defaults::DEFAULT_CACHE_SIZE_KIB,
        }
    }
}
