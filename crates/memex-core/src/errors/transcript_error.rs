/// Transcript-scanning errors. Per §7, almost every failure here is
/// recovered by skipping the offending message or resetting the cursor;
/// these variants exist mainly for logging at the call site.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("no jsonl files found in {0}")]
    NoTranscriptFiles(String),

    #[error("cursor file corrupt: {0}")]
    CursorCorrupt(String),

    #[error("io error reading transcript: {0}")]
    Io(String),
}

impl From<std::io::Error> for TranscriptError {
    fn from(err: std::io::Error) -> Self {
        TranscriptError::Io(err.to_string())
    }
}
