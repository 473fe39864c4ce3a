use axum::Json;
use axum::http::StatusCode;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use std::sync::Arc;

use crate::auth::extractors::Principal;
use crate::auth::services::{AuthService, SessionTokens};
use crate::error::AppError;
use sso_api::{
    LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest, RegisterResponse,
    SuccessResponse, TokenPairResponse,
};

impl From<SessionTokens> for TokenPairResponse {
    fn from(tokens: SessionTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if email.trim().is_empty() {
        return Err(AppError::validation("email is required"));
    }
    if !email.contains('@') {
        return Err(AppError::validation("email is invalid"));
    }
    if password.is_empty() {
        return Err(AppError::validation("password is required"));
    }
    Ok(())
}

/// POST /auth/register
pub async fn register(
    State(service): State<Arc<AuthService>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(payload) = payload?;
    validate_credentials(&payload.email, &payload.password)?;

    let user_id = service
        .register_new_user(&payload.email, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

/// POST /auth/login
pub async fn login(
    State(service): State<Arc<AuthService>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenPairResponse>, AppError> {
    let Json(payload) = payload?;
    validate_credentials(&payload.email, &payload.password)?;

    let tokens = service.login(&payload.email, &payload.password).await?;
    Ok(Json(tokens.into()))
}

/// POST /auth/refresh
pub async fn refresh_token(
    _principal: Principal,
    Extension(service): Extension<Arc<AuthService>>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<Json<TokenPairResponse>, AppError> {
    let Json(payload) = payload?;
    if payload.refresh_token.is_empty() {
        return Err(AppError::validation("refresh_token is required"));
    }

    let tokens = service.get_new_refresh_token(&payload.refresh_token).await?;
    Ok(Json(tokens.into()))
}

/// POST /auth/logout
pub async fn logout(
    principal: Principal,
    Extension(service): Extension<Arc<AuthService>>,
    payload: Result<Json<LogoutRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Json(payload) = payload?;
    if payload.refresh_token.is_empty() {
        return Err(AppError::validation("refresh_token is required"));
    }

    service.logout(&principal, &payload.refresh_token).await?;
    Ok(Json(SuccessResponse::ok()))
}
