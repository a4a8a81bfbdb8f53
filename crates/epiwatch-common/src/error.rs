use thiserror::Error;

#[derive(Debug, Error)]
pub enum EpiwatchError {
    /// A required argument was missing or out of range. Rejected before any
    /// computation runs.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Propagated unchanged from a store implementation. Never retried or
    /// swallowed by the analytics core.
    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EpiwatchError>;
