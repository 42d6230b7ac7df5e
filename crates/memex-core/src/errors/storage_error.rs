/// Storage-layer errors for SQLite operations (§7 "Storage transient" /
/// "Storage corruption").
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    Sqlite { message: String },

    #[error("database busy, exceeded {timeout_ms}ms busy timeout")]
    Busy { timeout_ms: u32 },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("database corruption detected: {details}")]
    Corrupted { details: String },

    #[error("no row found for id {0}")]
    NotFound(String),

    #[error("duplicate rule label: {0}")]
    DuplicateRuleLabel(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::DatabaseBusy =>
            {
                StorageError::Busy {
                    timeout_ms: crate::constants::BUSY_TIMEOUT_MS,
                }
            }
            other => StorageError::Sqlite {
                message: other.to_string(),
            },
        }
    }
}
