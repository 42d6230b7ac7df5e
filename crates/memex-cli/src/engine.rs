//! Wires the per-user base directory into the running set of components:
//! storage, embedder, clock, config, and the on-disk layout. Grounded on
//! `cortex-session::manager::SessionManager`, which holds the
//! same kind of "one struct per process, built once from a base path"
//! handle the rest of the binary's subcommands borrow from.

use std::path::PathBuf;

use memex_core::errors::{MemexResult, ValidationError};
use memex_core::{Clock, MemexConfig};
use memex_embed::EmbeddingEngine;
use memex_storage::StorageEngine;

use crate::paths::Layout;

pub struct MemexEngine {
    pub layout: Layout,
    pub config: MemexConfig,
    pub store: StorageEngine,
    pub embed: EmbeddingEngine,
    pub clock: Clock,
}

impl MemexEngine {
    /// Open (creating on first run) the engine rooted at `base_dir`.
    pub fn open(base_dir: PathBuf) -> MemexResult<Self> {
        let layout = Layout::new(base_dir.clone());
        layout.ensure_created()?;

        let config_path = base_dir.join("config.toml");
        let config = MemexConfig::load(base_dir, &config_path)?;

        let store = StorageEngine::open(&layout.db_path(), &config.store)?;
        let embed = EmbeddingEngine::with_local_backend();
        let clock = Clock::system();

        Ok(MemexEngine {
            layout,
            config,
            store,
            embed,
            clock,
        })
    }

    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today_local_ymd()
    }

    pub fn transcript_dir(&self) -> MemexResult<PathBuf> {
        self.config
            .transcript
            .directory
            .as_ref()
            .map(PathBuf::from)
            .ok_or_else(|| ValidationError::InvalidConfig("transcript.directory is not configured".into()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_layout_and_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MemexEngine::open(dir.path().to_path_buf()).unwrap();
        assert!(engine.layout.context_dir().is_dir());
        let status = engine.store.status().unwrap();
        assert_eq!(status.total, 0);
    }
}
