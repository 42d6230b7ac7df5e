mod defaults;
mod maintenance_config;
mod ranker_config;
mod store_config;
mod sync_config;
mod transcript_config;

pub use maintenance_config::MaintenanceConfig;
pub use ranker_config::RankerConfig;
pub use store_config::StoreConfig;
pub use sync_config::SyncConfig;
pub use transcript_config::TranscriptConfig;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration, one struct per component, loaded from a single TOML
/// file at `<base>/config.toml` with every field defaulted so a missing or
/// partial file is always usable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemexConfig {
    /// Per-user base directory (§6.1). Not itself part of the TOML file —
    /// supplied by the caller and merged in after load.
    #[serde(skip)]
    pub base_dir: PathBuf,
    pub store: StoreConfig,
    pub ranker: RankerConfig,
    pub maintenance: MaintenanceConfig,
    pub transcript: TranscriptConfig,
    pub sync: SyncConfig,
}

impl Default for MemexConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::new(),
            store: StoreConfig::default(),
            ranker: RankerConfig::default(),
            maintenance: MaintenanceConfig::default(),
            transcript: TranscriptConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl MemexConfig {
    /// Load from a TOML file, falling back to all defaults if the file does
    /// not exist. Malformed TOML is a validation error, not silently ignored.
    pub fn load(base_dir: PathBuf, path: &std::path::Path) -> crate::errors::MemexResult<Self> {
        let mut cfg = if path.exists() {
            let text = std::fs::read_to_string(path)
                .map_err(|e| crate::errors::ValidationError::InvalidPath(e.to_string()))?;
            toml::from_str::<MemexConfig>(&text)
                .map_err(|e| crate::errors::ValidationError::InvalidConfig(e.to_string()))?
        } else {
            MemexConfig::default()
        };
        cfg.base_dir = base_dir;
        Ok(cfg)
    }
}
