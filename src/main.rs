mod app;
mod auth;
mod clients;
mod config;
mod db;
mod error;
mod handlers;
#[cfg(test)]
mod test_support;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::build_router;
use crate::auth::jwt::TokenIssuer;
use crate::auth::password::PasswordManager;
use crate::auth::services::AuthService;
use crate::clients::url_service::UrlServiceClient;
use crate::config::Config;
use crate::db::connection::create_pool;
use crate::db::repositories::session_repository::SessionRepository;
use crate::db::repositories::user_repository::UserRepository;

const URL_SERVICE_TIMEOUT: Duration = Duration::from_secs(5);

pub fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // RUST_LOG unset
        tracing_subscriber::EnvFilter::new("info,sso=debug,hyper_util=warn,tower_http=info")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn build_service(config: &Config) -> anyhow::Result<AuthService> {
    let pool = create_pool(&config.database_url, config.db_pool_size, config.store_timeout)?;
    let tokens = TokenIssuer::new(
        &config.jwt_secret,
        config.access_token_ttl,
        config.refresh_token_ttl,
    );

    let service = AuthService::new(
        Arc::new(UserRepository::new(pool.clone())),
        Arc::new(SessionRepository::new(pool)),
        tokens.clone(),
        PasswordManager::new(config.bcrypt_cost),
        config.store_timeout,
    );

    let Some(url) = &config.url_service_url else {
        tracing::warn!("URL_SERVICE_URL not set, account deletion will not purge URL data");
        return Ok(service);
    };

    let client = UrlServiceClient::new(url, tokens, URL_SERVICE_TIMEOUT)
        .context("Failed to build URL service client")?;
    Ok(service.with_user_data_cleaner(Arc::new(client)))
}

// ----------------- Main -----------------

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    setup_logging();
    tracing::info!("Starting sso...");

    let config = Config::from_env()?;
    let service = Arc::new(build_service(&config)?);
    let app = build_router(service);

    if env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
        tracing::info!("Running in Lambda mode");
        lambda_http::run(app).await
    } else {
        tracing::info!("Running in local HTTP server mode");
        let addr = format!("{}:{}", config.server_host, config.server_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("Server running at http://{}", addr);
        axum::serve(listener, app).await?;

        Ok(())
    }
}
