use serde::{Deserialize, Serialize};

use super::defaults;

/// Maintenance subsystem configuration (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    pub consolidation_cosine_threshold: f32,
    pub consolidation_min_cluster_size: usize,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            consolidation_cosine_threshold: defaults::DEFAULT_CONSOLIDATION_THRESHOLD,
            consolidation_min_cluster_size: defaults::DEFAULT_CONSOLIDATION_MIN_CLUSTER,
        }
    }
}
