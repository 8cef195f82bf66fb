use thiserror::Error;

/// Errors raised while validating core domain values.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid access code: {0}")]
    InvalidAccessCode(String),
    #[error("invalid context tag: {0}")]
    InvalidContextTag(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The backing store failed while filling a missed entry.
    #[error("cache fill failed: {0}")]
    Fill(String),
}
