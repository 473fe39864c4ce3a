use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::{CleanupError, UserDataCleaner};
use crate::auth::jwt::TokenIssuer;

/// HTTP client for the URL shortener's `DELETE /admin` endpoint.
#[derive(Clone)]
pub struct UrlServiceClient {
    http: Client,
    base_url: String,
    tokens: TokenIssuer,
}

impl UrlServiceClient {
    pub fn new(
        base_url: &str,
        tokens: TokenIssuer,
        timeout: Duration,
    ) -> Result<Self, CleanupError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }
}

#[async_trait]
impl UserDataCleaner for UrlServiceClient {
    async fn delete_user_data(&self, user_id: i64) -> Result<(), CleanupError> {
        let token = self.tokens.issue_service_token(user_id)?;

        let response = self
            .http
            .delete(format!("{}/admin", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => {
                tracing::info!(user_id, "url data deleted");
                Ok(())
            }
            StatusCode::FORBIDDEN => Err(CleanupError::Forbidden),
            status => Err(CleanupError::UnexpectedStatus(status)),
        }
    }
}
