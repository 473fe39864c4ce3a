use axum::http::Uri;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::alias::{check_alias, random_alias};
use crate::auth::Principal;
use crate::db::error::StorageError;
use crate::db::models::{NewUrl, UrlRecord};
use crate::db::repository::UrlStore;
use crate::error::AppError;

/// Attempts at finding a free generated alias before giving up.
const MAX_ALIAS_ATTEMPTS: usize = 3;

pub struct UrlService {
    store: Arc<dyn UrlStore>,
    alias_length: usize,
}

impl UrlService {
    pub fn new(store: Arc<dyn UrlStore>, alias_length: usize) -> Self {
        Self {
            store,
            alias_length,
        }
    }

    /// Stores `url` under `alias`, or under a generated alias when none is given.
    pub async fn save_url(
        &self,
        user_id: i64,
        url: &str,
        alias: Option<&str>,
    ) -> Result<UrlRecord, AppError> {
        validate_url(url)?;

        let custom = alias.map(str::trim).filter(|a| !a.is_empty());
        if let Some(alias) = custom {
            check_alias(alias).map_err(AppError::validation)?;
            return self.insert(user_id, url, alias.to_string()).await;
        }

        let mut attempt = 1;
        loop {
            match self.insert(user_id, url, random_alias(self.alias_length)).await {
                Err(AppError::Storage(StorageError::AliasExists))
                    if attempt < MAX_ALIAS_ATTEMPTS =>
                {
                    debug!(attempt, "generated alias collided, retrying");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn insert(&self, user_id: i64, url: &str, alias: String) -> Result<UrlRecord, AppError> {
        let new_url = NewUrl {
            url: url.to_string(),
            alias: alias.clone(),
            user_id,
        };

        let id = self.store.save_url(new_url).await.inspect_err(|e| {
            if matches!(e, StorageError::AliasExists) {
                warn!(user_id, alias = %alias, "alias already exists");
            }
        })?;

        info!(user_id, id, alias = %alias, "url saved");
        Ok(UrlRecord {
            id,
            url: url.to_string(),
            alias,
            user_id,
        })
    }

    pub async fn resolve(&self, alias: &str, user_id: i64) -> Result<String, AppError> {
        let url = self.store.get_url(alias, user_id).await?;
        debug!(user_id, alias, "alias resolved");
        Ok(url)
    }

    pub async fn update_url(&self, user_id: i64, id: i64, url: &str) -> Result<(), AppError> {
        validate_url(url)?;
        self.store.update_url(id, url, user_id).await?;
        info!(user_id, id, "url updated");
        Ok(())
    }

    pub async fn delete_url(&self, user_id: i64, id: i64) -> Result<(), AppError> {
        self.store.delete_alias(id, user_id).await?;
        info!(user_id, id, "url deleted");
        Ok(())
    }

    pub async fn user_urls(&self, user_id: i64) -> Result<Vec<UrlRecord>, AppError> {
        Ok(self.store.get_user_urls(user_id).await?)
    }

    /// Wipes every link of the user named by the token. Only service and admin
    /// tokens may do this.
    pub async fn delete_user_data(&self, principal: &Principal) -> Result<(), AppError> {
        if !principal.may_purge_user_data() {
            warn!(user_id = principal.user_id, role = %principal.role, "user data purge refused");
            return Err(AppError::forbidden("role must be service or admin"));
        }

        let removed = self.store.delete_user_data(principal.user_id).await?;
        info!(user_id = principal.user_id, removed, "user data deleted");
        Ok(())
    }
}

/// Accepts absolute http(s) URLs with a host.
fn validate_url(raw: &str) -> Result<(), AppError> {
    if raw.trim().is_empty() {
        return Err(AppError::validation("url is required"));
    }

    let uri: Uri = raw
        .parse()
        .map_err(|_| AppError::validation("url is not a valid URL"))?;

    match uri.scheme_str() {
        Some("http" | "https") => {}
        _ => return Err(AppError::validation("url must use http or https")),
    }
    if uri.host().is_none_or(str::is_empty) {
        return Err(AppError::validation("url must have a host"));
    }
    Ok(())
}
