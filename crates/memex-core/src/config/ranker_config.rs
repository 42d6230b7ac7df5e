use serde::{Deserialize, Serialize};

use super::defaults;

/// Ranker subsystem configuration (§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    pub rrf_k: f64,
    pub candidate_pool_multiplier: usize,
    pub decay_half_life_days: f64,
    pub similar_issue_l2_threshold: f32,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            rrf_k: defaults::DEFAULT_RRF_K,
            candidate_pool_multiplier: defaults::DEFAULT_CANDIDATE_MULTIPLIER,
            decay_half_life_days: defaults::DEFAULT_DECAY_HALF_LIFE_DAYS,
            similar_issue_l2_threshold: defaults::DEFAULT_SIMILAR_ISSUE_THRESHOLD,
        }
    }
}
