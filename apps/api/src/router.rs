use std::sync::Arc;

use axum::{routing::get, Router};

use admin_cell::router::admin_user_routes;
use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use availability_cell::router::availability_routes;
use calendar_cell::router::calendar_routes;
use patient_cell::router::patient_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        // Session endpoints live at the root: /login, /logout, /user
        .merge(auth_routes(state.clone()))
        .nest("/admin", admin_user_routes(state.clone()))
        .nest("/availability", availability_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/calendar", calendar_routes(state))
}
