//! `memex maintain`: runs the five-step pipeline and persists the report
//! to `.last-maintenance` so the next SessionStart packet can surface it.

use memex_core::errors::{MemexResult, ValidationError};
use memex_maintain::{run_maintenance, MaintenanceReport};

use crate::engine::MemexEngine;

pub fn run(engine: &MemexEngine) -> MemexResult<MaintenanceReport> {
    let report = run_maintenance(&engine.store, engine.today())?;
    let text = serde_json::to_string(&report).map_err(|e| ValidationError::InvalidConfig(e.to_string()))?;
    std::fs::write(engine.layout.last_maintenance_path(), text)
        .map_err(|e| ValidationError::InvalidPath(e.to_string()))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_persists_a_readable_report() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MemexEngine::open(dir.path().to_path_buf()).unwrap();
        run(&engine).unwrap();
        let text = std::fs::read_to_string(engine.layout.last_maintenance_path()).unwrap();
        let report: MaintenanceReport = serde_json::from_str(&text).unwrap();
        assert!(!report.any_nonzero());
    }
}
