use axum::{
    Router,
    extract::Extension,
    routing::{delete, get},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::TokenVerifier;
use crate::handlers::{delete_url, delete_user_data, get_user_urls, redirect, save_url, update_url};
use crate::service::UrlService;

/// Every route requires a bearer token (state: TokenVerifier).
pub fn build_router(service: Arc<UrlService>, verifier: TokenVerifier) -> Router {
    Router::new()
        .route("/", delete(delete_url).post(save_url).patch(update_url))
        .route("/admin", delete(delete_user_data))
        .route("/urls", get(get_user_urls))
        .route("/{alias}", get(redirect))
        .with_state(verifier)
        .layer(Extension(service))
        .layer(TraceLayer::new_for_http())
}
