use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use availability_cell::router::availability_routes;
use shared_models::capability::Capability;
use shared_utils::test_utils::{MockStoreRows, TestConfig, TestSessions};

#[tokio::test]
async fn unauthenticated_request_is_401_before_permissions() {
    let config = TestConfig::default();
    let app = availability_routes(config.to_arc());

    // No Authorization header at all: the gate answers 401 without ever
    // looking at capabilities.
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_401() {
    let config = TestConfig::default();
    let app = availability_routes(config.to_arc());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/")
                .header("Authorization", "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authenticated_without_capability_is_403() {
    let config = TestConfig::default();
    let app = availability_routes(config.to_arc());

    let user = TestSessions::staff(vec![Capability::PatientRead]);
    let token = TestSessions::token_for(&user, &config.session_secret);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn authenticated_with_capability_reaches_the_store() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_store_url(&mock_server.uri());
    let app = availability_routes(config.to_arc());

    Mock::given(method("GET"))
        .and(path("/availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreRows::availability_row(Uuid::new_v4(), Uuid::new_v4(), false)
        ])))
        .mount(&mock_server)
        .await;

    let user = TestSessions::staff(vec![Capability::AvailabilityRead]);
    let token = TestSessions::token_for(&user, &config.session_secret);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
