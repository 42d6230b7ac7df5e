//! Literal constants pulled directly from the component design. Kept in one
//! place so the ranker, maintenance and transcript scanner agree on them.

/// RRF fusion constant (§4.3 step 4).
pub const RRF_K: f64 = 60.0;

/// Temporal decay half-life, in days (§4.3 step 5).
pub const DECAY_HALF_LIFE_DAYS: f64 = 30.0;

/// Candidate pool multiplier before fusion (§4.3 step 1, §5 backpressure).
pub const CANDIDATE_POOL_MULTIPLIER: usize = 3;

/// Cosine/L2 threshold used by `find_similar_issues` (§4.3) and transcript
/// near-duplicate dedup (§4.6). L2 distance on unit-norm vectors.
pub const SIMILAR_ISSUE_L2_THRESHOLD: f32 = 0.5;
pub const DEDUP_L2_THRESHOLD: f32 = 0.55;

/// Consolidation clustering cosine threshold (§4.4 step 5).
pub const CONSOLIDATION_COSINE_THRESHOLD: f32 = 0.75;
pub const CONSOLIDATION_MIN_CLUSTER_SIZE: usize = 3;
pub const CONSOLIDATION_WINDOW_DAYS: i64 = 30;
pub const CONSOLIDATION_MIN_AGE_DAYS: i64 = 3;

/// Pattern activity threshold (§3.3, §4.5).
pub const PATTERN_ACTIVE_MIN_OCCURRENCES: u64 = 3;
pub const PATTERN_LABEL_MAX_CHARS: usize = 80;

/// Embedder LRU capacity (§4.2).
pub const EMBED_CACHE_CAPACITY: u64 = 100;
pub const EMBED_DIM: usize = 384;

/// Transcript scanner bounds (§4.6, §5 backpressure).
pub const TRANSCRIPT_MAX_CHUNK_BYTES: usize = 10 * 1024 * 1024;
pub const TRANSCRIPT_MAX_MESSAGES_PER_SCAN: usize = 10;
pub const TRANSCRIPT_MIN_TEXT_LEN: usize = 20;
pub const TRANSCRIPT_USER_INTENT_THRESHOLD: f32 = 0.3;
pub const TRANSCRIPT_ASSISTANT_CATEGORY_THRESHOLD: f32 = 0.7;
pub const TRANSCRIPT_DIRECTIVE_GATE_MIN: f64 = 0.5;
pub const DEBUGGING_LOOKBACK_MESSAGES: usize = 8;

/// Replicator bounds (§4.7, §5 backpressure).
pub const REPLICATION_TICK_SECONDS: u64 = 120;
pub const REPLICATION_PAYLOAD_CAP_BYTES: usize = 10 * 1024 * 1024;
pub const OBJECT_STORE_TIMEOUT_SECONDS: u64 = 15;

/// Session-start injection budget (§6.7).
pub const SESSION_START_BUDGET_CHARS: usize = 4000;
pub const HANDOFF_MIN_INTERVAL_SECONDS: i64 = 5 * 60;

/// SQLite pragmas (§4.1 durability, §5 concurrency).
pub const BUSY_TIMEOUT_MS: u32 = 5000;
pub const SQLITE_MMAP_SIZE: i64 = 256 * 1024 * 1024;
pub const SQLITE_CACHE_SIZE_KIB: i64 = -64_000;

/// `mint_id` entropy/length bounds (§4.8).
pub const ID_MIN_ENTROPY_BITS: u32 = 48;
pub const ID_MIN_LEN: usize = 6;
pub const ID_MAX_LEN: usize = 10;

/// Access-count confidence buckets (§4.3 step 5).
pub fn confidence_multiplier(access_count: u64) -> f64 {
    match access_count {
        0 => 0.7,
        1..=2 => 1.0,
        3..=5 => 1.2,
        _ => 1.4,
    }
}

/// Tier weight multiplier (§4.3 step 5).
pub fn tier_weight(tier: crate::model::Tier) -> f64 {
    use crate::model::Tier;
    match tier {
        Tier::LongTerm => 1.5,
        Tier::Working => 1.0,
        Tier::Ephemeral => 0.5,
    }
}
