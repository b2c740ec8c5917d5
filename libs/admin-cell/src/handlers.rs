use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::SessionUser;
use shared_models::error::AppError;

use crate::models::{CreateUserRequest, UpdateUserRequest};
use crate::services::UserAdminService;

#[axum::debug_handler]
pub async fn list_users(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;

    let service = UserAdminService::new(&config);
    let users = service.list_users().await?;

    Ok(Json(json!(users)))
}

#[axum::debug_handler]
pub async fn create_user(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<SessionUser>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;

    let service = UserAdminService::new(&config);
    let created = service.create_user(request).await?;

    Ok(Json(json!(created)))
}

#[axum::debug_handler]
pub async fn update_user(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<SessionUser>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<Value>, AppError> {
    user.require_admin()?;

    let service = UserAdminService::new(&config);
    let updated = service.update_user(user_id, request).await?;

    Ok(Json(json!(updated)))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<SessionUser>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require_admin()?;

    let service = UserAdminService::new(&config);
    service.delete_user(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
