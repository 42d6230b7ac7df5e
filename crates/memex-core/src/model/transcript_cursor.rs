use serde::{Deserialize, Serialize};

/// Persisted as one blob at `<base>/db/.transcript-cursor` (§3.5, §6.1).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranscriptCursor {
    pub file: String,
    pub offset: u64,
}

impl TranscriptCursor {
    pub fn new(file: String, offset: u64) -> Self {
        TranscriptCursor { file, offset }
    }

    pub fn reset(file: String) -> Self {
        TranscriptCursor { file, offset: 0 }
    }
}
