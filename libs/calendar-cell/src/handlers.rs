use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::SessionUser;
use shared_models::capability::Capability;
use shared_models::error::AppError;
use shared_utils::time::parse_form_datetime;

use crate::models::CalendarQuery;
use crate::services::CalendarService;

#[axum::debug_handler]
pub async fn get_calendar(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Value>, AppError> {
    user.require(Capability::AvailabilityRead)?;

    let from = query
        .from
        .map(|raw| parse_form_datetime(&raw).map_err(AppError::ValidationError))
        .transpose()?;
    let to = query
        .to
        .map(|raw| parse_form_datetime(&raw).map_err(AppError::ValidationError))
        .transpose()?;

    let service = CalendarService::new(&config);
    let events = service.events_between(from, to).await?;

    Ok(Json(json!(events)))
}
