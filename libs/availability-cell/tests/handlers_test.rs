use std::sync::Arc;

use axum::extract::{Extension, Path, Query, State};
use axum::Json;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use availability_cell::handlers;
use availability_cell::models::{
    AvailabilityListQuery, CreateAvailabilityRequest, UpdateAvailabilityRequest,
};
use shared_config::AppConfig;
use shared_models::capability::Capability;
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreRows, TestConfig, TestSessions};

fn config_for(mock_server: &MockServer) -> Arc<AppConfig> {
    TestConfig::with_store_url(&mock_server.uri()).to_arc()
}

/// Matches only requests whose JSON body lacks the given key.
struct WithoutKey(&'static str);

impl wiremock::Match for WithoutKey {
    fn matches(&self, request: &Request) -> bool {
        match serde_json::from_slice::<serde_json::Value>(&request.body) {
            Ok(serde_json::Value::Object(map)) => !map.contains_key(self.0),
            _ => false,
        }
    }
}

#[tokio::test]
async fn create_defaults_end_time_to_start_plus_one_hour() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();

    // The mock only matches when the derived end time is start + 1h.
    Mock::given(method("POST"))
        .and(path("/availability"))
        .and(body_partial_json(json!({
            "doctor_id": doctor_id,
            "start_time": "2024-03-01T09:00:00+00:00",
            "end_time": "2024-03-01T10:00:00+00:00",
            "is_booked": false
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([MockStoreRows::availability_row(slot_id, doctor_id, false)])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let user = TestSessions::admin();
    let request = CreateAvailabilityRequest {
        doctor_id: Some(doctor_id),
        start_time: "2024-03-01T09:00".to_string(),
        end_time: None,
    };

    let Json(body) = handlers::create_availability(
        State(config_for(&mock_server)),
        Extension(user),
        Json(request),
    )
    .await
    .expect("create should succeed");

    assert_eq!(body["id"], json!(slot_id));
    assert_eq!(body["is_booked"], json!(false));
}

#[tokio::test]
async fn create_rejects_missing_doctor_id() {
    let mock_server = MockServer::start().await;

    let request = CreateAvailabilityRequest {
        doctor_id: None,
        start_time: "2024-03-01T09:00".to_string(),
        end_time: None,
    };

    let err = handlers::create_availability(
        State(config_for(&mock_server)),
        Extension(TestSessions::admin()),
        Json(request),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn create_rejects_malformed_times() {
    let mock_server = MockServer::start().await;

    let request = CreateAvailabilityRequest {
        doctor_id: Some(Uuid::new_v4()),
        start_time: "next tuesday".to_string(),
        end_time: None,
    };

    let err = handlers::create_availability(
        State(config_for(&mock_server)),
        Extension(TestSessions::admin()),
        Json(request),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn patch_without_start_time_never_touches_end_time_derivation() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();

    // A PATCH that omits start_time must send no start_time to the store
    // and must not recompute end_time beyond what the caller supplied.
    Mock::given(method("PATCH"))
        .and(path("/availability"))
        .and(query_param("id", format!("eq.{}", slot_id)))
        .and(WithoutKey("start_time"))
        .and(body_partial_json(json!({
            "end_time": "2024-03-01T11:30:00+00:00"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([MockStoreRows::availability_row(slot_id, doctor_id, false)])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = UpdateAvailabilityRequest {
        start_time: None,
        end_time: Some("2024-03-01T11:30".to_string()),
    };

    handlers::update_availability(
        State(config_for(&mock_server)),
        Extension(TestSessions::admin()),
        Path(slot_id),
        Json(request),
    )
    .await
    .expect("update should succeed");
}

#[tokio::test]
async fn update_unknown_slot_is_not_found() {
    let mock_server = MockServer::start().await;
    let slot_id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = UpdateAvailabilityRequest {
        start_time: Some("2024-03-01T09:00".to_string()),
        end_time: None,
    };

    let err = handlers::update_availability(
        State(config_for(&mock_server)),
        Extension(TestSessions::admin()),
        Path(slot_id),
        Json(request),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn delete_booked_slot_is_rejected() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/availability"))
        .and(query_param("id", format!("eq.{}", slot_id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([MockStoreRows::availability_row(slot_id, doctor_id, true)])),
        )
        .mount(&mock_server)
        .await;

    let err = handlers::delete_availability(
        State(config_for(&mock_server)),
        Extension(TestSessions::admin()),
        Path(slot_id),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn delete_unbooked_slot_succeeds() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/availability"))
        .and(query_param("id", format!("eq.{}", slot_id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([MockStoreRows::availability_row(slot_id, doctor_id, false)])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/availability"))
        .and(query_param("id", format!("eq.{}", slot_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let status = handlers::delete_availability(
        State(config_for(&mock_server)),
        Extension(TestSessions::admin()),
        Path(slot_id),
    )
    .await
    .expect("delete should succeed");

    assert_eq!(status, axum::http::StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn missing_capability_is_forbidden() {
    let mock_server = MockServer::start().await;

    let user = TestSessions::staff(vec![Capability::AvailabilityRead]);
    let request = CreateAvailabilityRequest {
        doctor_id: Some(Uuid::new_v4()),
        start_time: "2024-03-01T09:00".to_string(),
        end_time: None,
    };

    let err = handlers::create_availability(
        State(config_for(&mock_server)),
        Extension(user),
        Json(request),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn list_filters_by_doctor() {
    let mock_server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/availability"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([MockStoreRows::availability_row(slot_id, doctor_id, false)])),
        )
        .mount(&mock_server)
        .await;

    let user = TestSessions::staff(vec![Capability::AvailabilityRead]);
    let Json(body) = handlers::list_availability(
        State(config_for(&mock_server)),
        Extension(user),
        Query(AvailabilityListQuery {
            doctor_id: Some(doctor_id),
        }),
    )
    .await
    .expect("list should succeed");

    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["doctor_id"], json!(doctor_id));
}
