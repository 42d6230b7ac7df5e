//! `run_maintenance()` (§4.4): runs the five steps in order and reports
//! rows changed per step. Grounded structurally on
//! `cortex-decay::engine::DecayEngine::process_batch` (single entry point
//! orchestrating sub-steps, returning a summary), generalized from a
//! single decay pass to this component's five-step pipeline.

use chrono::NaiveDate;
use tracing::info;

use memex_core::errors::MemexResult;
use memex_storage::StorageEngine;

use crate::report::MaintenanceReport;
use crate::{consolidate, decay, demote, promote};

pub fn run_maintenance(store: &StorageEngine, today: NaiveDate) -> MemexResult<MaintenanceReport> {
    let decayed = decay::decay_ephemeral(store, today)?;
    let demoted = demote::demote_idle_working(store, today)?;
    let promoted_stable = promote::promote_stable(store, today)?;
    let promoted_frequent = promote::promote_frequent(store, today)?;
    let consolidated = consolidate::consolidate(store, today)?;

    let report = MaintenanceReport {
        decayed,
        demoted,
        promoted_stable,
        promoted_frequent,
        consolidated,
    };

    info!(
        decayed,
        demoted,
        promoted_stable,
        promoted_frequent,
        consolidated,
        "maintenance pass complete"
    );

    Ok(report)
}
