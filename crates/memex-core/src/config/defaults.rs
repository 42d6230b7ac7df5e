//! Named constants backing the `Default` impls below, following the
//! corpus's `config::defaults` convention of keeping every literal in one
//! place rather than inlined in each struct.

use crate::constants;

pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = constants::BUSY_TIMEOUT_MS;
pub const DEFAULT_MMAP_SIZE: i64 = constants::SQLITE_MMAP_SIZE;
pub const DEFAULT_CACHE_SIZE_KIB: i64 = constants::SQLITE_CACHE_SIZE_KIB;

pub const DEFAULT_RRF_K: f64 = constants::RRF_K;
pub const DEFAULT_CANDIDATE_MULTIPLIER: usize = constants::CANDIDATE_POOL_MULTIPLIER;
pub const DEFAULT_DECAY_HALF_LIFE_DAYS: f64 = constants::DECAY_HALF_LIFE_DAYS;
pub const DEFAULT_SIMILAR_ISSUE_THRESHOLD: f32 = constants::SIMILAR_ISSUE_L2_THRESHOLD;

pub const DEFAULT_CONSOLIDATION_THRESHOLD: f32 = constants::CONSOLIDATION_COSINE_THRESHOLD;
pub const DEFAULT_CONSOLIDATION_MIN_CLUSTER: usize = constants::CONSOLIDATION_MIN_CLUSTER_SIZE;

pub const DEFAULT_MAX_CHUNK_BYTES: usize = constants::TRANSCRIPT_MAX_CHUNK_BYTES;
pub const DEFAULT_MAX_MESSAGES_PER_SCAN: usize = constants::TRANSCRIPT_MAX_MESSAGES_PER_SCAN;

pub const DEFAULT_TICK_SECONDS: u64 = constants::REPLICATION_TICK_SECONDS;
pub const DEFAULT_PAYLOAD_CAP_BYTES: usize = constants::REPLICATION_PAYLOAD_CAP_BYTES;
pub const DEFAULT_OBJECT_STORE_TIMEOUT_SECONDS: u64 = constants::OBJECT_STORE_TIMEOUT_SECONDS;
