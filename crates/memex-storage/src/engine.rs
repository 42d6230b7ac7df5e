//! The `Store` component (§4.1): a durable typed entry table with a lexical
//! and a vector index kept consistent with it.

use std::path::{Path, PathBuf};

use memex_core::config::StoreConfig;
use memex_core::errors::MemexResult;
use memex_core::{Entry, EntryType, FilePair, Pattern, Tier};

use crate::pool::{pragmas::verify_wal_mode, ConnectionPool};
use crate::queries::entry_crud::ListFilter;
use crate::queries::entry_search::LexicalFilter;
use crate::queries::status::StorageStatus;
use crate::queries::*;

pub struct StorageEngine {
    pool: ConnectionPool,
    db_path: Option<PathBuf>,
}

impl StorageEngine {
    pub fn open(path: &Path, cfg: &StoreConfig) -> MemexResult<Self> {
        let pool = ConnectionPool::open(path, crate::pool::ReadPool::default_size(), cfg)?;
        let engine = Self {
            pool,
            db_path: Some(path.to_path_buf()),
        };
        engine.initialize()?;
        Ok(engine)
    }

    pub fn open_in_memory(cfg: &StoreConfig) -> MemexResult<Self> {
        let pool = ConnectionPool::open_in_memory(crate::pool::ReadPool::default_size(), cfg)?;
        let engine = Self { pool, db_path: None };
        engine.initialize()?;
        Ok(engine)
    }

    pub fn open_temp() -> MemexResult<(Self, tempfile::TempDir)> {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("store.sqlite3");
        let cfg = StoreConfig::default();
        let engine = Self::open(&path, &cfg)?;
        Ok((engine, dir))
    }

    fn initialize(&self) -> MemexResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            crate::migrations::run_migrations(conn)?;
            let _ = verify_wal_mode(conn);
            Ok(())
        })
    }

    fn with_reader<F, T>(&self, f: F) -> MemexResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> MemexResult<T>,
    {
        if self.db_path.is_none() {
            // In-memory readers see a different database than the writer;
            // route reads through the writer connection instead.
            return self.pool.writer.with_conn_sync(f);
        }
        self.pool.readers.with_conn(f)
    }

    // --- CRUD -----------------------------------------------------------

    pub fn insert(&self, entry: &Entry) -> MemexResult<i64> {
        entry.validate()?;
        self.pool.writer.with_conn_sync(|conn| entry_crud::insert(conn, entry))
    }

    pub fn insert_vec(&self, row_id: i64, v: &[f32]) -> MemexResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| vector_search::insert_vec(conn, row_id, v))
    }

    pub fn get_vec(&self, row_id: i64) -> MemexResult<Option<Vec<f32>>> {
        self.with_reader(|conn| vector_search::get_vec(conn, row_id))
    }

    pub fn get_by_id(&self, id: &str) -> MemexResult<Option<Entry>> {
        self.with_reader(|conn| entry_crud::get_by_id(conn, id))
    }

    pub fn get_by_rowids(&self, row_ids: &[i64]) -> MemexResult<Vec<Entry>> {
        self.with_reader(|conn| entry_crud::get_by_rowids(conn, row_ids))
    }

    pub fn has_entry(&self, id: &str) -> MemexResult<bool> {
        self.with_reader(|conn| entry_crud::has_entry(conn, id))
    }

    // --- Search -----------------------------------------------------------

    pub fn search_lexical(
        &self,
        query: &str,
        limit: usize,
        filter: LexicalFilter,
    ) -> MemexResult<Vec<(i64, Entry)>> {
        self.with_reader(|conn| entry_search::search_lexical(conn, query, limit, &filter))
    }

    pub fn search_vec(&self, v: &[f32], limit: usize) -> MemexResult<Vec<(i64, f32)>> {
        self.with_reader(|conn| vector_search::search_vec(conn, v, limit))
    }

    pub fn list(&self, filter: ListFilter) -> MemexResult<Vec<Entry>> {
        self.with_reader(|conn| entry_crud::list(conn, &filter))
    }

    pub fn list_with_rowids(&self, filter: ListFilter) -> MemexResult<Vec<(i64, Entry)>> {
        self.with_reader(|conn| entry_crud::list_with_rowids(conn, &filter))
    }

    pub fn find_by_tag(&self, tag: &str) -> MemexResult<Vec<Entry>> {
        self.with_reader(|conn| entry_crud::find_by_tag(conn, tag))
    }

    pub fn has_entry_with_tag(&self, tag: &str) -> MemexResult<bool> {
        self.with_reader(|conn| entry_crud::has_entry_with_tag(conn, tag))
    }

    pub fn list_by_session(&self, session_id: &str) -> MemexResult<Vec<Entry>> {
        self.with_reader(|conn| entry_crud::list_by_session(conn, session_id))
    }

    // --- Lifecycle --------------------------------------------------------

    pub fn archive(&self, ids: &[String]) -> MemexResult<usize> {
        self.pool.writer.with_conn_sync(|conn| entry_crud::archive(conn, ids))
    }

    pub fn update_tier(&self, id: &str, tier: Tier) -> MemexResult<()> {
        self.pool.writer.with_conn_sync(|conn| entry_crud::update_tier(conn, id, tier))
    }

    pub fn consolidate_into_survivor(
        &self,
        id: &str,
        tags: &[String],
        content: &str,
        tier: Tier,
    ) -> MemexResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| entry_crud::consolidate_into_survivor(conn, id, tags, content, tier))
    }

    pub fn bump_access(&self, ids: &[String], today: chrono::NaiveDate) -> MemexResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| entry_crud::bump_access(conn, ids, today))
    }

    pub fn clear_all(&self) -> MemexResult<()> {
        self.pool.writer.with_conn_sync(entry_crud::clear_all)
    }

    // --- Rules --------------------------------------------------------

    pub fn save_rule(&self, label: &str, content: &str, clock: &memex_core::Clock) -> MemexResult<Entry> {
        self.pool
            .writer
            .with_conn_sync(|conn| rule_queries::save_rule(conn, label, content, clock))
    }

    pub fn delete_rule(&self, label: &str) -> MemexResult<bool> {
        self.pool.writer.with_conn_sync(|conn| rule_queries::delete_rule(conn, label))
    }

    pub fn list_rules(&self) -> MemexResult<Vec<Entry>> {
        self.with_reader(rule_queries::list_rules)
    }

    // --- Patterns --------------------------------------------------------

    pub fn create_or_update_pattern(
        &self,
        new_id: String,
        label: &str,
        entry_ids: &std::collections::BTreeSet<String>,
        today: chrono::NaiveDate,
    ) -> MemexResult<String> {
        self.pool.writer.with_conn_sync(|conn| {
            pattern_queries::create_or_update_pattern(conn, new_id, label, entry_ids, today)
        })
    }

    pub fn get_active_patterns(&self) -> MemexResult<Vec<Pattern>> {
        self.with_reader(pattern_queries::get_active_patterns)
    }

    pub fn resolve_pattern(&self, id: &str) -> MemexResult<bool> {
        self.pool.writer.with_conn_sync(|conn| pattern_queries::resolve_pattern(conn, id))
    }

    pub fn get_pattern_for_entry(&self, entry_id: &str) -> MemexResult<Option<Pattern>> {
        self.with_reader(|conn| pattern_queries::get_pattern_for_entry(conn, entry_id))
    }

    // --- File pairs --------------------------------------------------------

    pub fn upsert_file_pair(
        &self,
        project: &str,
        file_a: &str,
        file_b: &str,
        today: chrono::NaiveDate,
    ) -> MemexResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            file_pair_queries::upsert_file_pair(conn, project, file_a, file_b, today)
        })
    }

    pub fn get_cochanges(&self, project: &str, file: &str, limit: usize) -> MemexResult<Vec<FilePair>> {
        self.with_reader(|conn| file_pair_queries::get_cochanges(conn, project, file, limit))
    }

    // --- Status --------------------------------------------------------

    pub fn status(&self) -> MemexResult<StorageStatus> {
        let path = self.db_path.clone();
        self.with_reader(move |conn| status::status(conn, path.as_deref()))
    }
}

/// `assign_tier` re-exported at the engine level for callers that build an
/// `Entry` outside the storage layer (§4.1).
pub fn assign_tier(entry_type: EntryType, explicit: Option<Tier>) -> Tier {
    Tier::assign(entry_type, explicit)
}
