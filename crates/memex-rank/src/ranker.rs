//! The `Ranker` component (§4.3): hybrid retrieval combining lexical and
//! vector search via RRF, then re-scored by temporal decay / tier weight /
//! access confidence. Grounded structurally on
//! `cortex-retrieval::engine::RetrievalEngine` orchestrating
//! `search::rrf_fusion` + `ranking::scorer`, narrowed to the two-source
//! fusion and single scoring formula this spec names.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use memex_core::config::RankerConfig;
use memex_core::constants::{CANDIDATE_POOL_MULTIPLIER, SIMILAR_ISSUE_L2_THRESHOLD};
use memex_core::errors::MemexResult;
use memex_core::{Entry, EntryType, Tier};
use memex_storage::{LexicalFilter, StorageEngine};

use crate::rrf::fuse;
use crate::scoring::score_entry;

/// `hybrid_search`/`fast`/`semantic` shared request shape (§4.3).
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub entry_type: Option<EntryType>,
    pub days: Option<i64>,
    pub limit: usize,
    pub tier: Option<Tier>,
    pub include_archived: bool,
    pub project: Option<String>,
}

/// Retrieval mode, either requested explicitly or auto-selected (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Hybrid,
    Fast,
    Semantic,
}

/// A single bare alphanumeric/`_`/`-` token selects `fast`; anything else
/// (multi-word, punctuation, natural language) selects `hybrid` (§4.3).
pub fn auto_select_mode(query: &str) -> SearchMode {
    static BARE_TOKEN: OnceLock<Regex> = OnceLock::new();
    let re = BARE_TOKEN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());
    if re.is_match(query.trim()) {
        SearchMode::Fast
    } else {
        SearchMode::Hybrid
    }
}

pub struct Ranker<'a> {
    store: &'a StorageEngine,
    config: RankerConfig,
}

impl<'a> Ranker<'a> {
    pub fn new(store: &'a StorageEngine, config: RankerConfig) -> Self {
        Self { store, config }
    }

    /// `hybrid_search` (§4.3 steps 1-8).
    pub fn hybrid_search(
        &self,
        query: &str,
        v_query: &[f32],
        filters: &SearchFilters,
        today: NaiveDate,
    ) -> MemexResult<Vec<Entry>> {
        let cand = CANDIDATE_POOL_MULTIPLIER * filters.limit.max(1);

        let lexical_hits = self.store.search_lexical(
            query,
            cand,
            LexicalFilter {
                entry_type: filters.entry_type,
                days: filters.days,
                include_archived: filters.include_archived,
                today,
            },
        )?;
        let vector_hits = self.store.search_vec(v_query, cand)?;

        let lexical_ids: Vec<i64> = lexical_hits.iter().map(|(id, _)| *id).collect();
        let vector_ids: Vec<i64> = vector_hits.iter().map(|(id, _)| *id).collect();
        let fused = fuse(&lexical_ids, &vector_ids, self.config.rrf_k);

        let row_ids: Vec<i64> = fused.keys().copied().collect();
        let entries = self.store.get_by_rowids(&row_ids)?;

        let mut scored: Vec<(f64, Entry)> = row_ids
            .iter()
            .zip(entries)
            .filter_map(|(row_id, entry)| {
                let rrf = *fused.get(row_id)?;
                Some((
                    score_entry(&entry, rrf, today, self.config.decay_half_life_days),
                    entry,
                ))
            })
            .filter(|(_, e)| self.passes_filters(e, filters))
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.1.date.cmp(&a.1.date))
                .then_with(|| b.1.time.cmp(&a.1.time))
        });
        scored.truncate(filters.limit);

        let ids: Vec<String> = scored.iter().map(|(_, e)| e.id.clone()).collect();
        self.store.bump_access(&ids, today)?;

        Ok(scored.into_iter().map(|(_, e)| e).collect())
    }

    /// `fast`: lexical only, no fusion, with access bump (§4.3).
    pub fn fast_search(
        &self,
        query: &str,
        filters: &SearchFilters,
        today: NaiveDate,
    ) -> MemexResult<Vec<Entry>> {
        let hits = self.store.search_lexical(
            query,
            filters.limit,
            LexicalFilter {
                entry_type: filters.entry_type,
                days: filters.days,
                include_archived: filters.include_archived,
                today,
            },
        )?;
        let entries: Vec<Entry> = hits
            .into_iter()
            .map(|(_, e)| e)
            .filter(|e| self.passes_filters(e, filters))
            .collect();
        let ids: Vec<String> = entries.iter().map(|e| e.id.clone()).collect();
        self.store.bump_access(&ids, today)?;
        Ok(entries)
    }

    /// `semantic`: vector only, local filters applied after load, with
    /// access bump (§4.3).
    pub fn semantic_search(
        &self,
        v_query: &[f32],
        filters: &SearchFilters,
        today: NaiveDate,
    ) -> MemexResult<Vec<Entry>> {
        let hits = self.store.search_vec(v_query, filters.limit * CANDIDATE_POOL_MULTIPLIER)?;
        let row_ids: Vec<i64> = hits.iter().map(|(id, _)| *id).collect();
        let entries = self.store.get_by_rowids(&row_ids)?;

        let mut filtered: Vec<Entry> = entries
            .into_iter()
            .filter(|e| self.passes_filters(e, filters))
            .collect();
        filtered.truncate(filters.limit);

        let ids: Vec<String> = filtered.iter().map(|e| e.id.clone()).collect();
        self.store.bump_access(&ids, today)?;
        Ok(filtered)
    }

    /// `find_similar_issues(v, days, distance_threshold)` (§4.3). No access
    /// bumping.
    pub fn find_similar_issues(
        &self,
        v: &[f32],
        days: i64,
        distance_threshold: f32,
        today: NaiveDate,
    ) -> MemexResult<Vec<Entry>> {
        let hits = self.store.search_vec(v, 256)?;
        let row_ids: Vec<i64> = hits
            .iter()
            .filter(|(_, dist)| *dist <= distance_threshold)
            .map(|(id, _)| *id)
            .collect();
        let entries = self.store.get_by_rowids(&row_ids)?;
        Ok(entries
            .into_iter()
            .filter(|e| {
                e.entry_type == EntryType::Issue
                    && !e.archived
                    && e.age_days(today) <= days
            })
            .collect())
    }

    fn passes_filters(&self, e: &Entry, filters: &SearchFilters) -> bool {
        if e.archived && !filters.include_archived {
            return false;
        }
        if let Some(tier) = filters.tier {
            if e.tier != tier {
                return false;
            }
        }
        if let Some(t) = filters.entry_type {
            if e.entry_type != t {
                return false;
            }
        }
        if let Some(project) = &filters.project {
            if e.project.as_deref() != Some(project.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Default L2 threshold used by `find_similar_issues` when a caller doesn't
/// override it (§4.3).
pub fn default_similar_issue_threshold() -> f32 {
    SIMILAR_ISSUE_L2_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_token_selects_fast() {
        assert_eq!(auto_select_mode("refactor_foo-bar123"), SearchMode::Fast);
    }

    #[test]
    fn phrase_selects_hybrid() {
        assert_eq!(auto_select_mode("why did the build break"), SearchMode::Hybrid);
    }

    #[test]
    fn empty_query_is_bare_fast_per_regex() {
        // An empty string does not match `^[a-zA-Z0-9_-]+$` (one-or-more),
        // so it falls through to hybrid.
        assert_eq!(auto_select_mode(""), SearchMode::Hybrid);
    }
}
