/// Replication/object-store errors (§7 "External"). Always recoverable at
/// the call site; a failed cycle updates no durable state.
#[derive(Debug, thiserror::Error)]
pub enum ReplicationError {
    #[error("object store request timed out after {0}s")]
    Timeout(u64),

    #[error("object store error: {0}")]
    ObjectStore(String),

    #[error("optimistic concurrency conflict on {key}")]
    VersionConflict { key: String },

    #[error("malformed entry record: {0}")]
    MalformedRecord(String),

    #[error("payload exceeds {max} bytes (got {actual})")]
    PayloadTooLarge { max: usize, actual: usize },
}
