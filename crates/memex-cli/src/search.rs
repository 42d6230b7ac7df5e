//! The retrieval contract (§6.6): wraps `Ranker`, auto-selecting a mode
//! when the caller doesn't name one, clamping `limit` to the documented
//! ceiling.

use memex_core::errors::MemexResult;
use memex_core::{Entry, EntryType, Tier};
use memex_rank::{auto_select_mode, Ranker, SearchFilters, SearchMode};

use crate::engine::MemexEngine;

const MAX_LIMIT: usize = 100;
const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: String,
    pub entry_type: Option<EntryType>,
    pub days: Option<i64>,
    pub limit: Option<usize>,
    pub tier: Option<Tier>,
    pub include_archived: bool,
    pub mode: Option<SearchMode>,
    pub project: Option<String>,
}

pub fn search(engine: &MemexEngine, req: &SearchRequest) -> MemexResult<Vec<Entry>> {
    let today = engine.today();
    let limit = req.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT).max(1);
    let mode = req.mode.unwrap_or_else(|| auto_select_mode(&req.query));

    let filters = SearchFilters {
        entry_type: req.entry_type,
        days: req.days,
        limit,
        tier: req.tier,
        include_archived: req.include_archived,
        project: req.project.clone(),
    };

    let ranker = Ranker::new(&engine.store, engine.config.ranker.clone());
    let v_query = engine.embed.embed(&req.query);

    match mode {
        SearchMode::Hybrid => ranker.hybrid_search(&req.query, &v_query, &filters, today),
        SearchMode::Fast => ranker.fast_search(&req.query, &filters, today),
        SearchMode::Semantic => ranker.semantic_search(&v_query, &filters, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::save;
    use memex_core::EntryType;

    #[test]
    fn search_finds_a_saved_entry_by_bare_token() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MemexEngine::open(dir.path().to_path_buf()).unwrap();
        save(
            &engine,
            EntryType::Decision,
            "sqlite chosen for local storage".to_string(),
            vec![],
            None,
            None,
            None,
            None,
            None,
        )
        .unwrap();

        let req = SearchRequest {
            query: "sqlite".to_string(),
            limit: Some(5),
            ..Default::default()
        };
        let hits = search(&engine, &req).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn search_clamps_limit_to_one_hundred() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MemexEngine::open(dir.path().to_path_buf()).unwrap();
        let req = SearchRequest {
            query: "anything".to_string(),
            limit: Some(9999),
            ..Default::default()
        };
        assert!(search(&engine, &req).is_ok());
    }
}
