//! Outbound calls to other services.

pub mod url_service;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("request to user data service failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("could not mint service token: {0}")]
    Token(#[from] crate::auth::jwt::JwtError),
    #[error("user data service refused the service token")]
    Forbidden,
    #[error("user data service answered {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}

/// Removes the data another service keeps for a user. Called during account
/// deletion, after the sessions are gone and before the user row is dropped.
#[async_trait]
pub trait UserDataCleaner: Send + Sync {
    async fn delete_user_data(&self, user_id: i64) -> Result<(), CleanupError>;
}
