use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::ports::{AuthError, StoreError};

/// Message returned for every upstream GitHub failure.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch GitHub repos";
/// Message returned for every failed login, whatever the provider said.
pub const LOGIN_FAILURE_MESSAGE: &str = "Login failed";

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// The GitHub API could not be reached or answered with a non-success status.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The auth provider refused the credentials (or failed while checking them).
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// No session cookie on a request that needs one.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A session cookie was present but the provider did not accept it.
    #[error("Invalid or expired token")]
    InvalidSession,

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The favourites store rejected the operation.
    #[error("Store error: {0}")]
    Store(String),

    /// The favourites store reported a uniqueness violation.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => {
                AppError::Conflict("Repository is already a favourite".to_string())
            }
            StoreError::Rejected(msg) => AppError::Store(msg),
            StoreError::Unavailable(msg) => AppError::Store(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::AuthenticationFailed(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    /// The status code and client-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::UpstreamUnavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                UPSTREAM_FAILURE_MESSAGE.to_string(),
            ),
            AppError::AuthenticationFailed(_) => {
                (StatusCode::BAD_REQUEST, LOGIN_FAILURE_MESSAGE.to_string())
            }
            AppError::NotAuthenticated => {
                (StatusCode::UNAUTHORIZED, "Not authenticated".to_string())
            }
            AppError::InvalidSession => (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Store(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::UpstreamUnavailable(detail) => {
                tracing::error!("Error fetching GitHub repos: {}", detail)
            }
            AppError::AuthenticationFailed(detail) => tracing::warn!("Login error: {}", detail),
            AppError::NotAuthenticated | AppError::InvalidSession => {
                tracing::warn!("Rejected request: {}", self)
            }
            AppError::Validation(msg) => tracing::debug!("Validation error: {}", msg),
            AppError::Store(msg) => tracing::error!("Store error: {}", msg),
            AppError::Conflict(msg) => tracing::debug!("Conflict: {}", msg),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
        }

        let (status, message) = self.status_and_message();

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, [(http::header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}
