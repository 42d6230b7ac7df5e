use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Two files observed modified in the same commit (§3.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePair {
    pub project: String,
    /// Stored in the order observed; not canonicalised.
    pub file_a: String,
    pub file_b: String,
    pub co_change_count: u64,
    pub last_seen: NaiveDate,
}
