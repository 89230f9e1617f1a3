use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::GymError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials or role mismatch.")]
    InvalidCredentials,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing authorization header")]
    MissingAuthHeader,
    #[error("Invalid authorization header format")]
    InvalidAuthHeaderFormat,
    #[error("Insufficient permissions")]
    InsufficientPermissions,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Password hashing error: {0}")]
    PasswordHashing(#[from] crate::auth::password::PasswordError),
    #[error(transparent)]
    Gym(#[from] GymError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Gym(inner) = self {
            return inner.into_response();
        }

        let (status, error_message) = match &self {
            AuthError::Gym(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
            AuthError::MissingAuthHeader => (StatusCode::UNAUTHORIZED, "Missing authorization header"),
            AuthError::InvalidAuthHeaderFormat => {
                (StatusCode::UNAUTHORIZED, "Invalid authorization header format")
            }
            AuthError::InsufficientPermissions => (StatusCode::FORBIDDEN, "Insufficient permissions"),
            AuthError::Database(e) => {
                tracing::error!("Database error during authentication: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            AuthError::Jwt(_) => (StatusCode::UNAUTHORIZED, "Token error"),
            AuthError::PasswordHashing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Password processing error")
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
