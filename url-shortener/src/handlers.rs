use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::auth::Principal;
use crate::error::AppError;
use crate::service::UrlService;
use sso_api::{DeleteUrlRequest, SaveUrlRequest, StatusResponse, UpdateUrlRequest, UrlResponse};

/// POST /
pub async fn save_url(
    principal: Principal,
    Extension(service): Extension<Arc<UrlService>>,
    payload: Result<Json<SaveUrlRequest>, JsonRejection>,
) -> Result<Json<UrlResponse>, AppError> {
    let Json(payload) = payload?;

    let saved = service
        .save_url(principal.user_id, &payload.url, payload.alias.as_deref())
        .await?;
    Ok(Json(saved.into()))
}

/// PATCH /
pub async fn update_url(
    principal: Principal,
    Extension(service): Extension<Arc<UrlService>>,
    payload: Result<Json<UpdateUrlRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, AppError> {
    let Json(payload) = payload?;

    service
        .update_url(principal.user_id, payload.url_id, &payload.url)
        .await?;
    Ok(Json(StatusResponse::ok()))
}

/// DELETE /
pub async fn delete_url(
    principal: Principal,
    Extension(service): Extension<Arc<UrlService>>,
    payload: Result<Json<DeleteUrlRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(payload) = payload?;

    service.delete_url(principal.user_id, payload.url_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /admin
pub async fn delete_user_data(
    principal: Principal,
    Extension(service): Extension<Arc<UrlService>>,
) -> Result<StatusCode, AppError> {
    service.delete_user_data(&principal).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /urls
pub async fn get_user_urls(
    principal: Principal,
    Extension(service): Extension<Arc<UrlService>>,
) -> Result<Json<Vec<UrlResponse>>, AppError> {
    let urls = service.user_urls(principal.user_id).await?;
    Ok(Json(urls.into_iter().map(UrlResponse::from).collect()))
}

/// GET /{alias}: 302 to the stored URL.
pub async fn redirect(
    Path(alias): Path<String>,
    principal: Principal,
    Extension(service): Extension<Arc<UrlService>>,
) -> Result<Response, AppError> {
    let url = service.resolve(&alias, principal.user_id).await?;
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}
