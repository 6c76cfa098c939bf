//! Integration tests for the /sms classification endpoint
//!
//! Drives the full router (middleware included) with a wiremock backend
//! standing in for the classification model.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use clap::Parser;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spamgate::backend::HttpBackendClient;
use spamgate::cli::Cli;
use spamgate::config::Config;
use spamgate::handlers::AppState;

fn app_for(model_host: &str, timeout_seconds: u64) -> Router {
    let cli = Cli::parse_from([
        "spamgate",
        "--request-timeout-seconds",
        &timeout_seconds.to_string(),
    ]);
    let config = Config::build(model_host, &cli)
        .expect("test config should build")
        .into_shared();
    let backend = Arc::new(HttpBackendClient::new(&config).expect("client should build"));
    let state = AppState::new(config, backend).expect("state should build");
    spamgate::app(state)
}

async fn post_sms(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body collects");
    let body = serde_json::from_slice(&bytes).expect("response is JSON");
    (status, body)
}

#[tokio::test]
async fn classification_round_trip_returns_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_partial_json(json!({"sms": "WIN a free cruise"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"sms": "WIN a free cruise", "result": "spam"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server.uri(), 3);
    let (status, body) = post_sms(app, "/sms", json!({"sms": "WIN a free cruise"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sms"], "WIN a free cruise");
    assert_eq!(body["result"], "spam");
}

#[tokio::test]
async fn trailing_slash_route_also_classifies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"sms": "lunch at noon?", "result": "ham"})),
        )
        .mount(&server)
        .await;

    let app = app_for(&server.uri(), 3);
    let (status, body) = post_sms(app, "/sms/", json!({"sms": "lunch at noon?"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "ham");
}

#[tokio::test]
async fn verdict_is_normalized_to_lowercase() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"sms": "hello", "result": "  HAM \n"})),
        )
        .mount(&server)
        .await;

    let app = app_for(&server.uri(), 3);
    let (_, body) = post_sms(app, "/sms", json!({"sms": "hello"})).await;
    assert_eq!(body["result"], "ham");
}

#[tokio::test]
async fn empty_message_returns_sentinel_without_calling_backend() {
    let server = MockServer::start().await;
    // No mock mounted: any backend call would 404 and show up as an
    // unexpected-request failure in wiremock's verification.
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let app = app_for(&server.uri(), 3);
    let (status, body) = post_sms(app, "/sms", json!({"sms": "   "})).await;

    assert_eq!(status, StatusCode::OK, "domain errors never change the status");
    assert_eq!(body["result"], "error: empty message");
}

#[tokio::test]
async fn backend_error_status_returns_sentinel_not_transport_fault() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let app = app_for(&server.uri(), 3);
    let (status, body) = post_sms(app, "/sms", json!({"sms": "is this spam?"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "error: backend unavailable");
}

#[tokio::test]
async fn backend_reply_without_result_field_is_a_dispatch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sms": "hello"})))
        .mount(&server)
        .await;

    let app = app_for(&server.uri(), 3);
    let (status, body) = post_sms(app, "/sms", json!({"sms": "hello"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "error: backend unavailable");
}

#[tokio::test]
async fn get_sms_redirects_to_trailing_slash() {
    let app = app_for("http://localhost:9", 3);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/sms")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .expect("redirect has a location")
            .to_str()
            .expect("ascii header"),
        "/sms/"
    );
}

#[tokio::test]
async fn responses_carry_a_request_id_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"sms": "hi", "result": "ham"})),
        )
        .mount(&server)
        .await;

    let app = app_for(&server.uri(), 3);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/sms")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"sms": "hi"}).to_string()))
                .expect("request builds"),
        )
        .await
        .expect("request completes");

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header present")
        .to_str()
        .expect("ascii header");
    assert!(
        uuid::Uuid::parse_str(request_id).is_ok(),
        "x-request-id should be a UUID, got {request_id}"
    );
}
