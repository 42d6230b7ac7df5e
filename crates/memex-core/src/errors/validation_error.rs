/// Input-rejection errors (§7 "Validation"). Surfaced with a one-line
/// message; no partial state is committed when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("content exceeds {max} bytes (got {actual})")]
    ContentTooLarge { max: usize, actual: usize },

    #[error("unknown entry type: {0}")]
    UnknownType(String),

    #[error("unknown tier: {0}")]
    UnknownTier(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid regex: {0}")]
    InvalidRegex(String),

    #[error("rule entries require a label")]
    RuleMissingLabel,

    #[error("limit {0} exceeds the maximum of 100")]
    LimitTooLarge(usize),
}
