use axum::{
    Router,
    extract::Extension,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::services::AuthService;
use crate::handlers::auth::{login, logout, refresh_token, register};
use crate::handlers::health::health;
use crate::handlers::user::{delete_user_by_email, delete_user_by_id};

/// Authentication routes
pub fn auth_routes(service: Arc<AuthService>) -> Router {
    let tokens = service.token_issuer().clone();

    // Public endpoints (state: AuthService)
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(service.clone());

    // Protected endpoints (state: TokenIssuer) using the Principal extractor
    let protected = Router::new()
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .with_state(tokens)
        .layer(Extension(service));

    public.merge(protected)
}

/// Account management routes, all protected
pub fn user_routes(service: Arc<AuthService>) -> Router {
    let tokens = service.token_issuer().clone();

    Router::new()
        .route("/{id}", delete(delete_user_by_id))
        .route("/by-email/{email}", delete(delete_user_by_email))
        .with_state(tokens)
        .layer(Extension(service))
}

pub fn build_router(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes(service.clone()))
        .nest("/users", user_routes(service))
        .layer(TraceLayer::new_for_http())
}
