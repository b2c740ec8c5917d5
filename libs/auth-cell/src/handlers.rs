use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::store::StoreClient;
use shared_models::auth::{SessionUser, UserAccount};
use shared_models::error::AppError;
use shared_utils::password::verify_password;
use shared_utils::session::issue_token;

use crate::models::{LoginRequest, LoginResponse};

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    debug!("Login attempt for user: {}", request.username);

    let store = StoreClient::new(&config);
    let path = format!("/users?username=eq.{}", request.username);
    let rows: Vec<Value> = store
        .request(Method::GET, &path, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    // Same response for unknown user and wrong password
    let account: UserAccount = rows
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Auth("Invalid username or password".to_string()))
        .and_then(|row| {
            serde_json::from_value(row)
                .map_err(|e| AppError::Internal(format!("Malformed store row: {}", e)))
        })?;

    if !account.is_active {
        return Err(AppError::Auth("Account is disabled".to_string()));
    }

    let valid = verify_password(&request.password, &account.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

    if !valid {
        return Err(AppError::Auth("Invalid username or password".to_string()));
    }

    let user = account.to_session_user();
    let token = issue_token(&user, &config.session_secret).map_err(AppError::Internal)?;

    debug!("Login successful for user: {}", user.id);

    Ok(Json(LoginResponse { token, user }))
}

/// Session tokens are self-contained; logout is the client discarding its
/// token.
#[axum::debug_handler]
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[axum::debug_handler]
pub async fn current_user(
    Extension(user): Extension<SessionUser>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(json!(user)))
}
