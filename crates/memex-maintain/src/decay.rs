//! Step 1 — decay ephemeral (§4.4): archive stale `ephemeral` entries.
//! Grounded structurally on `cortex-decay::archival::evaluate`'s
//! archive/don't-archive decision shape, with the bucketed
//! `(access_count, age_days)` thresholds this spec names in place of the
//! `cortex-decay`'s confidence-threshold formula.

use chrono::NaiveDate;

use memex_core::errors::MemexResult;
use memex_core::{Entry, Tier};
use memex_storage::{ListFilter, StorageEngine};

fn is_stale(access_count: u64, age_days: i64) -> bool {
    match access_count {
        0 => age_days > 3,
        1..=2 => age_days > 7,
        _ => age_days > 14,
    }
}

pub fn decay_ephemeral(store: &StorageEngine, today: NaiveDate) -> MemexResult<usize> {
    let entries = store.list(ListFilter {
        entry_type: None,
        days: None,
        include_archived: false,
        today,
    })?;

    let stale_ids: Vec<String> = entries
        .iter()
        .filter(|e: &&Entry| e.tier == Tier::Ephemeral && !e.pinned)
        .filter(|e| is_stale(e.access_count, e.age_days(today)))
        .map(|e| e.id.clone())
        .collect();

    store.archive(&stale_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_access_tolerates_three_days() {
        assert!(!is_stale(0, 3));
        assert!(is_stale(0, 4));
    }

    #[test]
    fn frequent_access_tolerates_longest() {
        assert!(!is_stale(6, 14));
        assert!(is_stale(6, 15));
    }
}
