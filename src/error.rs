use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sso_api::ErrorResponse;

use crate::auth::errors::{AuthError, CredentialFault};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // === Auth core outcomes ===
    #[error(transparent)]
    Auth(#[from] AuthError),

    // === Transport ===
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, internal_detail) = self.get_error_info();

        if let Some(ref detail) = internal_detail {
            tracing::error!(error_code, %status, %detail, "Internal server error");
        }

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details: None,
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        self.get_error_info().0
    }

    /// Status, machine-readable code, client-safe message and, for server-side
    /// failures, the detail that only goes to the log.
    fn get_error_info(&self) -> (StatusCode, &'static str, String, Option<String>) {
        match self {
            AppError::Auth(err) => Self::auth_error_info(err),

            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
            }
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::InvalidBody(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone(), None)
            }
        }
    }

    fn auth_error_info(err: &AuthError) -> (StatusCode, &'static str, String, Option<String>) {
        match err {
            AuthError::InvalidCredentials(CredentialFault::BadLogin) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password".to_string(),
                None,
            ),
            AuthError::InvalidCredentials(CredentialFault::NotPermitted) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Not allowed to act on this resource".to_string(),
                None,
            ),
            AuthError::InvalidRefreshToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid refresh token".to_string(),
                None,
            ),
            AuthError::SessionExpired => (
                StatusCode::UNAUTHORIZED,
                "SESSION_EXPIRED",
                "Session expired, please log in again".to_string(),
                None,
            ),
            AuthError::SessionNotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Session not found".to_string(),
                None,
            ),
            AuthError::UserNotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "User not found".to_string(),
                None,
            ),
            AuthError::UserExists => (
                StatusCode::CONFLICT,
                "USER_EXISTS",
                "Email already exists".to_string(),
                None,
            ),
            AuthError::MalformedRefreshToken(_) => (
                StatusCode::BAD_REQUEST,
                "INVALID_TOKEN_FORMAT",
                "Refresh token format is invalid".to_string(),
                None,
            ),
            AuthError::DeadlineExceeded => (
                StatusCode::GATEWAY_TIMEOUT,
                "TIMEOUT",
                "The request took too long to complete".to_string(),
                Some(err.to_string()),
            ),
            AuthError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
                Some(err.to_string()),
            ),
        }
    }

    // === Helper constructors ===
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }
}
