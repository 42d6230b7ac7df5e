//! Steps 3 and 4 — promote stable working entries to longterm, and promote
//! frequently-accessed ephemeral entries to working (§4.4).

use chrono::NaiveDate;

use memex_core::errors::MemexResult;
use memex_core::{Entry, EntryType, Tier};
use memex_storage::{ListFilter, StorageEngine};

/// `tier=working AND type∈{decision, insight} AND age_days>7 ⇒ longterm`.
pub fn promote_stable(store: &StorageEngine, today: NaiveDate) -> MemexResult<usize> {
    let entries = store.list(ListFilter {
        entry_type: None,
        days: None,
        include_archived: false,
        today,
    })?;

    let targets: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.tier == Tier::Working && !e.pinned)
        .filter(|e| matches!(e.entry_type, EntryType::Decision | EntryType::Insight))
        .filter(|e| e.age_days(today) > 7)
        .collect();

    for e in &targets {
        store.update_tier(&e.id, Tier::LongTerm)?;
    }
    Ok(targets.len())
}

/// `tier=ephemeral AND access_count≥3 ⇒ working`.
pub fn promote_frequent(store: &StorageEngine, today: NaiveDate) -> MemexResult<usize> {
    let entries = store.list(ListFilter {
        entry_type: None,
        days: None,
        include_archived: false,
        today,
    })?;

    let targets: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.tier == Tier::Ephemeral && !e.pinned && e.access_count >= 3)
        .collect();

    for e in &targets {
        store.update_tier(&e.id, Tier::Working)?;
    }
    Ok(targets.len())
}
