//! Issue-save hook (§4.5): on inserting a `type=issue` entry, looks for
//! similar existing issues and folds them into a pattern.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use memex_core::errors::MemexResult;
use memex_core::{Clock, Entry};
use memex_rank::Ranker;
use memex_storage::StorageEngine;

/// Minimum number of similar issues (excluding the new one) required before
/// a pattern is created or updated (§4.5: "If ≥2 results").
const MIN_SIMILAR_FOR_PATTERN: usize = 2;

/// `on_issue_saved` (§4.5): runs `find_similar_issues`, and when there are
/// enough hits, calls `create_or_update_pattern`. Returns the pattern id if
/// one was created or updated.
pub fn on_issue_saved(
    store: &StorageEngine,
    new_entry: &Entry,
    v_new: &[f32],
    clock: &Clock,
    today: NaiveDate,
) -> MemexResult<Option<String>> {
    let ranker = Ranker::new(store, memex_core::config::RankerConfig::default());
    let similar = ranker.find_similar_issues(v_new, 30, memex_core::constants::SIMILAR_ISSUE_L2_THRESHOLD, today)?;

    let similar_ids: Vec<String> = similar
        .into_iter()
        .filter(|e| e.id != new_entry.id)
        .map(|e| e.id)
        .collect();

    if similar_ids.len() < MIN_SIMILAR_FOR_PATTERN {
        return Ok(None);
    }

    let mut entry_ids: BTreeSet<String> = similar_ids.into_iter().collect();
    entry_ids.insert(new_entry.id.clone());

    let label = content_summary(&new_entry.content);
    let pattern_id = store.create_or_update_pattern(clock.mint_id(), &label, &entry_ids, today)?;
    Ok(Some(pattern_id))
}

fn content_summary(content: &str) -> String {
    content.chars().take(memex_core::constants::PATTERN_LABEL_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_summary_truncates() {
        let long = "a".repeat(200);
        assert_eq!(content_summary(&long).len(), memex_core::constants::PATTERN_LABEL_MAX_CHARS);
    }
}
