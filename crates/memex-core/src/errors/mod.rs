mod replication_error;
mod storage_error;
mod transcript_error;
mod validation_error;

pub use replication_error::ReplicationError;
pub use storage_error::StorageError;
pub use transcript_error::TranscriptError;
pub use validation_error::ValidationError;

/// Crate-wide error type. Every subsystem error enum converts into this via
/// `#[from]`, mirroring the aggregation pattern used for `CortexError`.
#[derive(Debug, thiserror::Error)]
pub enum MemexError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error(transparent)]
    Replication(#[from] ReplicationError),

    /// Model/embedder failure (§7). Non-fatal on most paths; callers that
    /// need the fatal `save` semantics match on this variant explicitly.
    #[error("embedder failure: {0}")]
    Embedder(String),

    #[error("clock error: {0}")]
    Clock(String),
}

pub type MemexResult<T> = Result<T, MemexError>;
