//! Cycle (§4.7): push then pull, each wrapped so a failure in one never
//! blocks the other's state update — mirroring
//! `CloudEngine::sync`, which treats a push/pull failure as "go offline",
//! not "abort the whole engine".

use std::path::Path;

use memex_core::errors::MemexResult;
use memex_core::ReplicationState;
use memex_embed::EmbeddingEngine;
use memex_storage::StorageEngine;

use crate::blob_store::BlobStore;
use crate::pull::{pull, PullReport};
use crate::push::{push, PushReport};

#[derive(Debug, Default)]
pub struct CycleReport {
    pub push: Option<PushReport>,
    pub pull: Option<PullReport>,
    pub push_error: Option<String>,
    pub pull_error: Option<String>,
}

impl CycleReport {
    pub fn had_any_error(&self) -> bool {
        self.push_error.is_some() || self.pull_error.is_some()
    }
}

/// Run one push-then-pull cycle. Errors from either half are captured into
/// the report rather than propagated, per §4.7 "Cycle" — "surface a
/// non-empty error string; the caller decides whether to log".
pub fn run_cycle(
    store: &StorageEngine,
    embed: &EmbeddingEngine,
    object_store: &dyn BlobStore,
    cache_dir: &Path,
    state: &mut ReplicationState,
    today: chrono::NaiveDate,
) -> CycleReport {
    let mut report = CycleReport::default();

    match push(store, object_store, &state.config.machine_id, cache_dir, state.last_push_at, today) {
        Ok((push_report, at)) => {
            state.last_push_at = Some(at);
            report.push = Some(push_report);
        }
        Err(e) => report.push_error = Some(e.to_string()),
    }

    match pull(store, embed, object_store, &state.config.machine_id, &mut state.remote_cursors) {
        Ok((pull_report, at)) => {
            state.last_pull_at = Some(at);
            report.pull = Some(pull_report);
        }
        Err(e) => report.pull_error = Some(e.to_string()),
    }

    report
}

pub fn to_memex_result(report: &CycleReport) -> MemexResult<()> {
    if let Some(err) = &report.push_error {
        return Err(memex_core::errors::ReplicationError::ObjectStore(err.clone()).into());
    }
    if let Some(err) = &report.pull_error {
        return Err(memex_core::errors::ReplicationError::ObjectStore(err.clone()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob_store::fake::InMemoryBlobStore;
    use chrono::NaiveDate;
    use memex_core::ReplicationConfig;

    #[test]
    fn cycle_updates_last_push_and_pull_timestamps_on_success() {
        let (store, _guard) = StorageEngine::open_temp().unwrap();
        let embed = EmbeddingEngine::with_local_backend();
        let object_store = InMemoryBlobStore::default();
        let dir = tempfile::tempdir().unwrap();
        let mut state = ReplicationState::new(ReplicationConfig {
            machine_id: "m1".to_string(),
            machine_name: "laptop".to_string(),
            repo_owner: "acme".to_string(),
            repo_name: "memex-sync-store".to_string(),
            enabled: true,
        });

        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let report = run_cycle(&store, &embed, &object_store, dir.path(), &mut state, today);

        assert!(!report.had_any_error());
        assert!(state.last_push_at.is_some());
        assert!(state.last_pull_at.is_some());
    }
}
