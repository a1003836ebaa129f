use thiserror::Error;

/// Closed set of outcomes the service distinguishes. Each variant carries
/// only what the caller needs to pick a response, never a raw driver error.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid caller identity: {0}")]
    Unauthenticated(String),

    #[error("Record is outside the caller's scope: {0}")]
    OwnershipMismatch(String),
}

pub type Result<T> = std::result::Result<T, StatsError>;
