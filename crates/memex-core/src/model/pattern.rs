use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named group of recurring similar issues (§3.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    /// Truncated to `PATTERN_LABEL_MAX_CHARS`.
    pub label: String,
    pub entry_ids: BTreeSet<String>,
    pub occurrence_count: u64,
    pub first_seen: NaiveDate,
    pub last_seen: NaiveDate,
    pub resolved: bool,
}

impl Pattern {
    pub fn new(id: String, label: String, entry_ids: BTreeSet<String>, today: NaiveDate) -> Self {
        let label = truncate_label(&label);
        let occurrence_count = entry_ids.len() as u64;
        Pattern {
            id,
            label,
            entry_ids,
            occurrence_count,
            first_seen: today,
            last_seen: today,
            resolved: false,
        }
    }

    /// A pattern is "active" iff unresolved and `occurrence_count >= 3`.
    pub fn is_active(&self) -> bool {
        !self.resolved && self.occurrence_count >= crate::constants::PATTERN_ACTIVE_MIN_OCCURRENCES
    }

    pub fn merge(&mut self, label: &str, entry_ids: &BTreeSet<String>, today: NaiveDate) {
        self.entry_ids.extend(entry_ids.iter().cloned());
        self.occurrence_count = self.entry_ids.len() as u64;
        self.last_seen = today;
        self.label = truncate_label(label);
    }
}

fn truncate_label(label: &str) -> String {
    label
        .chars()
        .take(crate::constants::PATTERN_LABEL_MAX_CHARS)
        .collect()
}
