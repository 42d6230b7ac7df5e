//! Step 2 — demote idle working entries to ephemeral (§4.4).

use chrono::NaiveDate;

use memex_core::errors::MemexResult;
use memex_core::{Entry, Tier};
use memex_storage::{ListFilter, StorageEngine};

fn is_idle(access_count: u64, idle_days: i64) -> bool {
    match access_count {
        0 => idle_days > 15,
        1..=2 => idle_days > 30,
        _ => idle_days > 60,
    }
}

pub fn demote_idle_working(store: &StorageEngine, today: NaiveDate) -> MemexResult<usize> {
    let entries = store.list(ListFilter {
        entry_type: None,
        days: None,
        include_archived: false,
        today,
    })?;

    let targets: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.tier == Tier::Working && !e.pinned)
        .filter(|e| is_idle(e.access_count, e.idle_days(today)))
        .collect();

    for e in &targets {
        store.update_tier(&e.id, Tier::Ephemeral)?;
    }
    Ok(targets.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_match_spec_buckets() {
        assert!(!is_idle(0, 15));
        assert!(is_idle(0, 16));
        assert!(!is_idle(2, 30));
        assert!(is_idle(2, 31));
        assert!(!is_idle(3, 60));
        assert!(is_idle(3, 61));
    }
}
