use std::sync::Arc;

use axum::extract::{Extension, Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::handlers;
use patient_cell::models::{CreatePatientRequest, UpdatePatientRequest};
use shared_config::AppConfig;
use shared_models::capability::Capability;
use shared_models::error::AppError;
use shared_utils::test_utils::{MockStoreRows, TestConfig, TestSessions};

fn config_for(mock_server: &MockServer) -> Arc<AppConfig> {
    TestConfig::with_store_url(&mock_server.uri()).to_arc()
}

#[tokio::test]
async fn create_echoes_submitted_fields_with_assigned_id() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/patients"))
        .and(body_partial_json(json!({
            "first_name": "Nora",
            "last_name": "Quinn",
            "date_of_birth": "1987-06-14",
            "phone": "+353851234567",
            "email": "nora.quinn@example.com"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!([MockStoreRows::patient_row(patient_id)])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let user = TestSessions::staff(vec![Capability::PatientCreate]);
    let request = CreatePatientRequest {
        first_name: "Nora".to_string(),
        last_name: "Quinn".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1987, 6, 14).unwrap(),
        phone: "+353851234567".to_string(),
        email: "nora.quinn@example.com".to_string(),
        notes: None,
    };

    let Json(body) = handlers::create_patient(
        State(config_for(&mock_server)),
        Extension(user),
        Json(request),
    )
    .await
    .expect("create should succeed");

    assert_eq!(body["id"], json!(patient_id));
    assert_eq!(body["first_name"], json!("Nora"));
    assert_eq!(body["last_name"], json!("Quinn"));
}

#[tokio::test]
async fn get_unknown_patient_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let user = TestSessions::staff(vec![Capability::PatientRead]);
    let err = handlers::get_patient(
        State(config_for(&mock_server)),
        Extension(user),
        Path(Uuid::new_v4()),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn partial_update_only_sends_provided_fields() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/patients"))
        .and(query_param("id", format!("eq.{}", patient_id)))
        .and(body_partial_json(json!({ "phone": "+353861112222" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([MockStoreRows::patient_row(patient_id)])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let user = TestSessions::staff(vec![Capability::PatientUpdate]);
    let request = UpdatePatientRequest {
        first_name: None,
        last_name: None,
        date_of_birth: None,
        phone: Some("+353861112222".to_string()),
        email: None,
        notes: None,
    };

    handlers::update_patient(
        State(config_for(&mock_server)),
        Extension(user),
        Path(patient_id),
        Json(request),
    )
    .await
    .expect("update should succeed");
}

#[tokio::test]
async fn delete_without_capability_is_forbidden() {
    let mock_server = MockServer::start().await;

    let user = TestSessions::staff(vec![Capability::PatientRead]);
    let err = handlers::delete_patient(
        State(config_for(&mock_server)),
        Extension(user),
        Path(Uuid::new_v4()),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn delete_returns_no_content() {
    let mock_server = MockServer::start().await;
    let patient_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/patients"))
        .and(query_param("id", format!("eq.{}", patient_id)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([MockStoreRows::patient_row(patient_id)])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let user = TestSessions::staff(vec![Capability::PatientDelete]);
    let status = handlers::delete_patient(
        State(config_for(&mock_server)),
        Extension(user),
        Path(patient_id),
    )
    .await
    .expect("delete should succeed");

    assert_eq!(status, axum::http::StatusCode::NO_CONTENT);
}
