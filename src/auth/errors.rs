use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::auth::refresh_token::RefreshTokenError;
use crate::db::error::RepositoryError;

/// Why a caller was refused with `InvalidCredentials`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFault {
    /// Unknown email or wrong password.
    BadLogin,
    /// Authenticated, but not allowed to act on the target.
    NotPermitted,
}

/// Outcomes of the auth core. Store and crypto failures are folded into
/// `Internal` (or `DeadlineExceeded`) here so nothing driver-specific leaks out.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials(CredentialFault),
    #[error("user already exists")]
    UserExists,
    #[error("user not found")]
    UserNotFound,
    #[error("session not found")]
    SessionNotFound,
    #[error("session expired")]
    SessionExpired,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("malformed refresh token: {0}")]
    MalformedRefreshToken(#[from] RefreshTokenError),
    #[error("store deadline exceeded")]
    DeadlineExceeded,
    #[error("internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl AuthError {
    pub fn bad_login() -> Self {
        Self::InvalidCredentials(CredentialFault::BadLogin)
    }

    pub fn not_permitted() -> Self {
        Self::InvalidCredentials(CredentialFault::NotPermitted)
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Timeout => Self::DeadlineExceeded,
            other => Self::internal(other),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        Self::internal(err)
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        Self::internal(err)
    }
}
