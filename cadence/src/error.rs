use thiserror::Error;

/// Crate-wide error type. HTTP handlers never return this directly; they
/// convert it into the v1 response envelope, which decides what is safe to
/// put on the wire.
#[derive(Error, Debug)]
pub enum CadenceError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Embedding provider unreachable or returned something unusable.
    /// Non-retryable within the call; the caller decides whether to retry.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// The store rejected a write. The entry was not stored, not partially
    /// written.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API rate limit exceeded, retry after {retry_after:?} seconds")]
    ApiRateLimit { retry_after: Option<u64> },

    #[error("API authentication error: {0}")]
    ApiAuth(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CadenceError>;
