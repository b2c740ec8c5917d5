use std::sync::Arc;

use axum::extract::{Extension, Query, State};
use axum::Json;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use calendar_cell::handlers;
use calendar_cell::models::{CalendarQuery, DEFAULT_EVENT_COLOR};
use shared_config::AppConfig;
use shared_models::capability::Capability;
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreRows, TestConfig, TestSessions};

fn config_for(mock_server: &MockServer) -> Arc<AppConfig> {
    TestConfig::with_store_url(&mock_server.uri()).to_arc()
}

async fn mount_sources(
    mock_server: &MockServer,
    slots: serde_json::Value,
    appointments: serde_json::Value,
    doctors: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path("/availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(slots))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(appointments))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("role", "eq.doctor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(doctors))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn merges_slots_and_appointments_into_events() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();
    let appointment_id = Uuid::new_v4();

    mount_sources(
        &mock_server,
        json!([MockStoreRows::availability_row(slot_id, doctor_id, false)]),
        json!([MockStoreRows::appointment_row(appointment_id, Uuid::new_v4(), doctor_id)]),
        json!([MockStoreRows::user_row(doctor_id, "dr.byrne", "password123", "doctor")]),
    )
    .await;

    let user = TestSessions::staff(vec![Capability::AvailabilityRead]);
    let Json(body) = handlers::get_calendar(
        State(config_for(&mock_server)),
        Extension(user),
        Query(CalendarQuery { from: None, to: None }),
    )
    .await
    .expect("calendar should succeed");

    let events = body.as_array().expect("events array");
    assert_eq!(events.len(), 2);

    // Availabilities first, then appointments (stable per-source order).
    assert_eq!(events[0]["id"], json!(slot_id));
    assert_eq!(events[0]["kind"], json!("availability"));
    assert_eq!(events[0]["is_booked"], json!(false));
    // user_row assigns doctors the #2e7d32 calendar color.
    assert_eq!(events[0]["color"], json!("#2e7d32"));

    assert_eq!(events[1]["id"], json!(appointment_id));
    assert_eq!(events[1]["kind"], json!("appointment"));
    assert_eq!(events[1]["is_booked"], json!(true));
}

#[tokio::test]
async fn unknown_doctor_gets_the_default_color() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();

    mount_sources(
        &mock_server,
        json!([MockStoreRows::availability_row(slot_id, doctor_id, true)]),
        json!([]),
        json!([]),
    )
    .await;

    let user = TestSessions::staff(vec![Capability::AvailabilityRead]);
    let Json(body) = handlers::get_calendar(
        State(config_for(&mock_server)),
        Extension(user),
        Query(CalendarQuery { from: None, to: None }),
    )
    .await
    .expect("calendar should succeed");

    assert_eq!(body[0]["color"], json!(DEFAULT_EVENT_COLOR));
    assert_eq!(body[0]["is_booked"], json!(true));
}

#[tokio::test]
async fn malformed_window_is_a_validation_error() {
    let mock_server = MockServer::start().await;

    let user = TestSessions::staff(vec![Capability::AvailabilityRead]);
    let err = handlers::get_calendar(
        State(config_for(&mock_server)),
        Extension(user),
        Query(CalendarQuery {
            from: Some("not-a-date".to_string()),
            to: None,
        }),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn requires_availability_read() {
    let mock_server = MockServer::start().await;

    let user = TestSessions::staff(vec![Capability::AppointmentRead]);
    let err = handlers::get_calendar(
        State(config_for(&mock_server)),
        Extension(user),
        Query(CalendarQuery { from: None, to: None }),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
}
