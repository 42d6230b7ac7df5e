//! # memex-storage
//!
//! The durable `Store` component: one SQLite database holding the entry
//! table, its FTS5 lexical index, a brute-force vector index, the pattern
//! table, and the file-pair (co-change) table. A single writer connection
//! plus a pool of read connections, matching the pragma set and
//! serialisation discipline the engine design calls for.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;
pub use queries::entry_crud::ListFilter;
pub use queries::entry_search::LexicalFilter;
pub use queries::status::StorageStatus;

#[cfg(test)]
mod tests {
    use super::*;
    use memex_core::{Clock, Entry, EntryType, Tier};

    fn engine() -> StorageEngine {
        StorageEngine::open_in_memory(&memex_core::config::StoreConfig::default())
            .expect("open in-memory store")
    }

    fn sample_entry(clock: &Clock, content: &str) -> Entry {
        Entry::new(
            clock.mint_id(),
            clock.today_local_ymd(),
            clock.time_hhmm(),
            EntryType::Issue,
            vec!["test".into()],
            content.to_string(),
            None,
        )
    }

    #[test]
    fn insert_and_get_roundtrips() {
        let engine = engine();
        let clock = Clock::system();
        let entry = sample_entry(&clock, "something broke");
        engine.insert(&entry).unwrap();
        let fetched = engine.get_by_id(&entry.id).unwrap().unwrap();
        assert_eq!(fetched.content, entry.content);
        assert_eq!(fetched.tier, Tier::Working);
    }

    #[test]
    fn archive_is_idempotent_for_unpinned_ids() {
        let engine = engine();
        let clock = Clock::system();
        let entry = sample_entry(&clock, "flaky test");
        engine.insert(&entry).unwrap();

        let first = engine.archive(&[entry.id.clone()]).unwrap();
        let second = engine.archive(&[entry.id.clone()]).unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 0);
    }

    #[test]
    fn archive_never_touches_pinned_entries() {
        let engine = engine();
        let clock = Clock::system();
        let mut entry = sample_entry(&clock, "pinned note");
        entry.pinned = true;
        engine.insert(&entry).unwrap();

        let changed = engine.archive(&[entry.id.clone()]).unwrap();
        assert_eq!(changed, 0);
        assert!(!engine.get_by_id(&entry.id).unwrap().unwrap().archived);
    }

    #[test]
    fn save_rule_twice_keeps_one_row_with_latest_content() {
        let engine = engine();
        let clock = Clock::system();
        engine.save_rule("no-force-push", "never force push to main", &clock).unwrap();
        engine.save_rule("no-force-push", "never force push, ever", &clock).unwrap();

        let rules = engine.list_rules().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].content, "never force push, ever");
        assert_eq!(rules[0].tier, Tier::LongTerm);
        assert!(rules[0].pinned);
    }

    #[test]
    fn vector_search_is_empty_for_zero_norm_query() {
        let engine = engine();
        let clock = Clock::system();
        let entry = sample_entry(&clock, "vectorised entry");
        let row_id = engine.insert(&entry).unwrap();
        engine.insert_vec(row_id, &vec![1.0 / 8.0_f32.sqrt(); 384][..8]).ok();

        let hits = engine.search_vec(&[0.0; 8], 5).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn lexical_search_excludes_archived_by_default() {
        let engine = engine();
        let clock = Clock::system();
        let entry = sample_entry(&clock, "database connection pooling issue");
        engine.insert(&entry).unwrap();
        engine.archive(&[entry.id.clone()]).unwrap();

        let hits = engine
            .search_lexical(
                "database",
                10,
                LexicalFilter {
                    entry_type: None,
                    days: None,
                    include_archived: false,
                    today: clock.today_local_ymd(),
                },
            )
            .unwrap();
        assert!(hits.is_empty());
    }
}
