//! Error types for TweetApp
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application-wide error type
///
/// Services raise the typed variants for expected conditions; the
/// `IntoResponse` impl is the only place that knows about status codes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Tweet key is blank or absent (404)
    #[error("This tweet does not exist anymore.")]
    TweetNotFound,

    /// User key is absent (404)
    #[error("User not found")]
    UserNotFound,

    /// Registration with a taken username (409)
    #[error("username already exists")]
    UsernameAlreadyExists,

    /// Blank username where one is required (422)
    #[error("Username/loginId provided is invalid")]
    InvalidUsername,

    /// Contact/username check failed on password change (400)
    #[error("Two Passwords didn't match. unable to change password for user : {0}")]
    PasswordMismatch(String),

    /// Bad credentials on login (401)
    #[error("Bad credentials")]
    Unauthorized,

    /// Validation error (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unprocessable entity (422)
    #[error("Unprocessable entity: {0}")]
    Unprocessable(String),

    /// Duplicate document key (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored document could not be (de)serialized (500)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl AppError {
    /// HTTP status and metric label for this error
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::TweetNotFound => (StatusCode::NOT_FOUND, "tweet_not_found"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found"),
            AppError::UsernameAlreadyExists => (StatusCode::CONFLICT, "username_exists"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::InvalidUsername => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_username"),
            AppError::Unprocessable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable"),
            AppError::PasswordMismatch(_) => (StatusCode::BAD_REQUEST, "password_mismatch"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database"),
            AppError::Serialization(_) => (StatusCode::INTERNAL_SERVER_ERROR, "serialization"),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }

    /// Status code this error maps to at the HTTP boundary
    pub fn status_code(&self) -> StatusCode {
        self.classify().0
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Server-side faults never leak their detail; the full error is logged
    /// instead.
    fn into_response(self) -> Response {
        use axum::Json;

        let (status, error_type) = self.classify();
        let error_message = if status.is_server_error() {
            tracing::error!(error = %self, error_type, "Request failed");
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        use crate::metrics::ERRORS_TOTAL;
        ERRORS_TOTAL.with_label_values(&[error_type]).inc();

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
