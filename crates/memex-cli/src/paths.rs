//! §6.1 filesystem layout: one per-user base directory, every
//! subdirectory created mode 0700.

use std::path::{Path, PathBuf};

use memex_core::errors::{MemexResult, ValidationError};

#[derive(Debug, Clone)]
pub struct Layout {
    pub base: PathBuf,
}

impl Layout {
    pub fn new(base: PathBuf) -> Self {
        Layout { base }
    }

    pub fn context_dir(&self) -> PathBuf {
        self.base.join("context")
    }

    pub fn context_file(&self, date: chrono::NaiveDate) -> PathBuf {
        self.context_dir().join(format!("{}.md", date.format("%Y-%m-%d")))
    }

    pub fn db_dir(&self) -> PathBuf {
        self.base.join("db")
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_dir().join("store")
    }

    pub fn transcript_cursor_path(&self) -> PathBuf {
        self.db_dir().join(".transcript-cursor")
    }

    pub fn last_handoff_path(&self) -> PathBuf {
        self.db_dir().join(".last-handoff")
    }

    pub fn last_maintenance_path(&self) -> PathBuf {
        self.db_dir().join(".last-maintenance")
    }

    pub fn models_dir(&self) -> PathBuf {
        self.base.join("models")
    }

    pub fn sync_dir(&self) -> PathBuf {
        self.base.join("sync")
    }

    pub fn sync_state_path(&self) -> PathBuf {
        self.sync_dir().join("state.json")
    }

    /// Create every directory in the layout, mode 0700 (§6.1).
    pub fn ensure_created(&self) -> MemexResult<()> {
        for dir in [self.context_dir(), self.db_dir(), self.models_dir(), self.sync_dir()] {
            create_private_dir(&dir)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> MemexResult<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(dir).map_err(|e| ValidationError::InvalidPath(e.to_string()))?;
    let perms = std::fs::Permissions::from_mode(0o700);
    std::fs::set_permissions(dir, perms).map_err(|e| ValidationError::InvalidPath(e.to_string()))?;
    Ok(())
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> MemexResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| ValidationError::InvalidPath(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_created_makes_every_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path().to_path_buf());
        layout.ensure_created().unwrap();
        assert!(layout.context_dir().is_dir());
        assert!(layout.db_dir().is_dir());
        assert!(layout.models_dir().is_dir());
        assert!(layout.sync_dir().is_dir());
    }
}
