//! `memex sync`: runs one push/pull cycle against the configured object
//! store, loading and saving replication state at `<base>/sync/state.json`
//! (§6.1, §6.4).

use memex_core::errors::{MemexResult, ValidationError};
use memex_sync::{run_cycle, CycleReport, HttpBlobStore};

use crate::engine::MemexEngine;

pub fn run(engine: &MemexEngine) -> MemexResult<CycleReport> {
    let base_url = engine
        .config
        .sync
        .base_url
        .clone()
        .ok_or_else(|| ValidationError::InvalidConfig("sync.base_url is not configured".into()))?;

    let mut state = memex_sync::state::load(&engine.layout.sync_state_path()).ok_or_else(|| {
        ValidationError::InvalidConfig(
            "replication state is missing; this host has not been registered yet".into(),
        )
    })?;

    let object_store = HttpBlobStore::new(base_url, engine.config.sync.object_store_timeout_seconds)?;

    let report = run_cycle(
        &engine.store,
        &engine.embed,
        &object_store,
        &engine.layout.sync_dir(),
        &mut state,
        engine.today(),
    );

    memex_sync::state::save(&engine.layout.sync_state_path(), &state)?;

    Ok(report)
}
