use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use keyhole_resolver::ResolveError;
use thiserror::Error;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

pub const WRONG_PASSWORD: &str = "Wrong password";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Errors returned by the HTTP handlers.
///
/// `BadRequest` and `WrongPassword` carry messages meant for the visitor.
/// `Internal` keeps its detail for the server log only.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("wrong password")]
    WrongPassword,
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::WrongPassword => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message sent to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(message) => message.clone(),
            AppError::PayloadTooLarge => "Request body too large".to_string(),
            AppError::WrongPassword => WRONG_PASSWORD.to_string(),
            AppError::Internal(_) => INTERNAL_SERVER_ERROR.to_string(),
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::BadRequest(message) => AppError::BadRequest(message),
            ResolveError::NotFound => AppError::WrongPassword,
            ResolveError::Storage(source) => AppError::Internal(source.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge;
        }
        AppError::BadRequest("Invalid JSON body".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            error!(error = %detail, "request failed with internal error");
        }

        let body = ErrorResponse {
            success: false,
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
