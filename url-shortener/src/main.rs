mod alias;
mod app;
mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod service;

use std::env;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::build_router;
use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::db::create_pool;
use crate::db::repository::UrlRepository;
use crate::service::UrlService;

pub fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // RUST_LOG unset
        tracing_subscriber::EnvFilter::new(
            "info,url_shortener=debug,hyper_util=warn,tower_http=info",
        )
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    setup_logging();
    tracing::info!("Starting url-shortener...");

    let config = Config::from_env()?;
    let pool = create_pool(
        &config.database_url,
        config.db_pool_size,
        config.db_connect_timeout,
    )?;
    let service = Arc::new(UrlService::new(
        Arc::new(UrlRepository::new(pool)),
        config.alias_length,
    ));
    let app = build_router(service, TokenVerifier::new(&config.jwt_secret));

    if env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
        tracing::info!("Running in Lambda mode");
        lambda_http::run(app).await
    } else {
        let addr = format!("{}:{}", config.server_host, config.server_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("Server running at http://{}", addr);
        axum::serve(listener, app).await?;

        Ok(())
    }
}
