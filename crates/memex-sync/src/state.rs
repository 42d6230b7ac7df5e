//! Persistence for `<base>/sync/state.json` (§3.6, §6.1).

use std::path::Path;

use memex_core::errors::{MemexResult, ValidationError};
use memex_core::ReplicationState;

pub fn load(path: &Path) -> Option<ReplicationState> {
    let text = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

pub fn save(path: &Path, state: &ReplicationState) -> MemexResult<()> {
    let text = serde_json::to_string_pretty(state).map_err(|e| ValidationError::InvalidConfig(e.to_string()))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ValidationError::InvalidPath(e.to_string()))?;
    }
    std::fs::write(path, text).map_err(|e| ValidationError::InvalidPath(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use memex_core::ReplicationConfig;

    #[test]
    fn state_roundtrips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync").join("state.json");
        let state = ReplicationState::new(ReplicationConfig {
            machine_id: "m1".to_string(),
            machine_name: "laptop".to_string(),
            repo_owner: "acme".to_string(),
            repo_name: "memex-sync-store".to_string(),
            enabled: true,
        });
        save(&path, &state).unwrap();
        let back = load(&path).unwrap();
        assert_eq!(back.config.machine_id, "m1");
    }

    #[test]
    fn load_returns_none_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("missing.json")).is_none());
    }
}
