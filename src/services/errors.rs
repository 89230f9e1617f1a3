use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures of the gym core operations.
///
/// `Database` aborts the surrounding transaction; the caller only sees a
/// generic failure. Every other kind is a typed, non-retried result.
#[derive(Error, Debug)]
pub enum GymError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Password processing error: {0}")]
    Password(#[from] crate::auth::PasswordError),
}

impl GymError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GymError::NotFound(_) => StatusCode::NOT_FOUND,
            GymError::Unauthorized => StatusCode::FORBIDDEN,
            GymError::InvalidStatus(_) | GymError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GymError::Password(crate::auth::PasswordError::HashingFailed)
            | GymError::Password(crate::auth::PasswordError::VerificationFailed) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GymError::Password(_) => StatusCode::BAD_REQUEST,
            GymError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            GymError::NotFound(_) => "NOT_FOUND",
            GymError::Unauthorized => "UNAUTHORIZED",
            GymError::InvalidStatus(_) => "INVALID_STATUS",
            GymError::InvalidInput(_) => "INVALID_INPUT",
            GymError::Database(_) | GymError::Password(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for GymError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            GymError::Database(e) => {
                tracing::error!("Database failure: {}", e);
                "An error occurred while processing the request.".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "error": self.error_code(),
            "message": message,
        }));

        (status, body).into_response()
    }
}
