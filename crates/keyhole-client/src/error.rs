use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Shown for anything the visitor cannot fix by retyping the code.
pub const CONNECTION_ERROR: &str = "Connection error. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The gateway refused the request (4xx or `success: false`).
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl ClientError {
    /// The message to put in front of a visitor.
    ///
    /// Rejections are passed through verbatim; everything else collapses to a
    /// generic retry prompt.
    pub fn user_message(&self) -> &str {
        match self {
            ClientError::Rejected { message, .. } => message,
            _ => CONNECTION_ERROR,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } | ClientError::Server { status, .. } => {
                Some(*status)
            }
            ClientError::Network(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}
