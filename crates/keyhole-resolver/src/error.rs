use keyhole_core::{CoreError, StorageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Failure kinds of an unlock attempt.
///
/// `BadRequest` and `NotFound` are caused by the caller and safe to show;
/// `Storage` is internal and must not be surfaced verbatim.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("{0}")]
    BadRequest(String),
    #[error("access code not found")]
    NotFound,
    #[error("storage operation failed: {0}")]
    Storage(
        #[from]
        #[source]
        StorageError,
    ),
}

impl From<CoreError> for ResolveError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidAccessCode(message) | CoreError::InvalidContextTag(message) => {
                ResolveError::BadRequest(message)
            }
        }
    }
}
