use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::SessionUser;
use shared_models::capability::Capability;
use shared_models::error::AppError;

use crate::models::{AvailabilityListQuery, CreateAvailabilityRequest, UpdateAvailabilityRequest};
use crate::services::AvailabilityService;

#[axum::debug_handler]
pub async fn list_availability(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<AvailabilityListQuery>,
) -> Result<Json<Value>, AppError> {
    user.require(Capability::AvailabilityRead)?;

    let service = AvailabilityService::new(&config);
    let slots = service.list_availability(query.doctor_id).await?;

    Ok(Json(json!(slots)))
}

#[axum::debug_handler]
pub async fn create_availability(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<SessionUser>,
    Json(request): Json<CreateAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    user.require(Capability::AvailabilityCreate)?;

    let service = AvailabilityService::new(&config);
    let slot = service.create_availability(request).await?;

    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn update_availability(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<SessionUser>,
    Path(availability_id): Path<Uuid>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    user.require(Capability::AvailabilityUpdate)?;

    let service = AvailabilityService::new(&config);
    let slot = service.update_availability(availability_id, request).await?;

    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn delete_availability(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<SessionUser>,
    Path(availability_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require(Capability::AvailabilityDelete)?;

    let service = AvailabilityService::new(&config);
    service.delete_availability(availability_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
