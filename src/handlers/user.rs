use axum::Json;
use axum::extract::{Extension, Path};
use std::sync::Arc;

use crate::auth::extractors::Principal;
use crate::auth::services::AuthService;
use crate::error::AppError;
use sso_api::SuccessResponse;

/// DELETE /users/{id}
pub async fn delete_user_by_id(
    Path(user_id): Path<i64>,
    principal: Principal,
    Extension(service): Extension<Arc<AuthService>>,
) -> Result<Json<SuccessResponse>, AppError> {
    service.delete_user_by_id(&principal, user_id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /users/by-email/{email}
pub async fn delete_user_by_email(
    Path(email): Path<String>,
    principal: Principal,
    Extension(service): Extension<Arc<AuthService>>,
) -> Result<Json<SuccessResponse>, AppError> {
    if email.trim().is_empty() {
        return Err(AppError::validation("email is required"));
    }

    service.delete_user_by_email(&principal, &email).await?;
    Ok(Json(SuccessResponse::ok()))
}
