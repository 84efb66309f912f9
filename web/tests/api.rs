//! End-to-end router tests over an in-memory record store.

#![allow(clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/panic

use algorithm_hub_auth::{AuthConfig, Claims, TokenVerifier};
use algorithm_hub_core::StorageError;
use algorithm_hub_runtime::AlgorithmService;
use algorithm_hub_testing::{InMemoryRecordStore, StoreOperation, test_clock};
use algorithm_hub_web::{AppState, CORRELATION_ID_HEADER, build_router};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "router-test-secret";

struct Harness {
    app: Router,
    store: InMemoryRecordStore,
}

impl Harness {
    fn new() -> Self {
        let store = InMemoryRecordStore::new();
        let service = AlgorithmService::new(Arc::new(store.clone()), Arc::new(test_clock()));
        let verifier = TokenVerifier::new(AuthConfig::new(SECRET)).unwrap();
        let app = build_router(AppState::new(service, verifier), &[]);
        Self { app, store }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, json_body(response).await)
    }
}

fn token_for(user_id: &str) -> String {
    let verifier = TokenVerifier::new(AuthConfig::new(SECRET)).unwrap();
    verifier
        .issue(
            &Claims::for_user(user_id, Utc::now(), Duration::minutes(30))
                .with_email(format!("{user_id}@example.com")),
        )
        .unwrap()
}

fn get(uri: &str, user_id: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token_for(user_id)));
    }
    builder.body(Body::empty()).unwrap()
}

fn process(user_id: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/algorithms/process")
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(user_id)))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[tokio::test]
async fn test_health_needs_no_auth() {
    let harness = Harness::new();
    let response = harness.app.clone().oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(CORRELATION_ID_HEADER));
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_types_lists_catalog() {
    let (status, body) = Harness::new().send(get("/api/v1/algorithms/types", None)).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["types"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["fibonacci", "prime_check", "sorting", "matrix_multiply"]);
}

#[tokio::test]
async fn test_process_fibonacci() {
    let harness = Harness::new();
    let (status, body) = harness
        .send(process("u1", &json!({"algorithm_type": "fibonacci", "input_data": {"n": 10}})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["algorithm_type"], "fibonacci");
    assert_eq!(body["status"], "completed");
    assert_eq!(body["result"]["result"], 55);
    assert_eq!(body["processing_time"], "0ms");
    assert_eq!(harness.store.len(), 1);
}

#[tokio::test]
async fn test_process_requires_token() {
    let harness = Harness::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/algorithms/process")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"algorithm_type": "fibonacci", "input_data": {}}).to_string()))
        .unwrap();

    let (status, body) = harness.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert!(harness.store.is_empty());
}

#[tokio::test]
async fn test_process_rejects_bad_token() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/auth/me")
        .header(header::AUTHORIZATION, "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();

    let (status, body) = Harness::new().send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().unwrap().starts_with("Could not validate credentials"));
}

#[tokio::test]
async fn test_boundary_validation_is_422_and_writes_nothing() {
    let harness = Harness::new();
    let cases = [
        json!({"algorithm_type": "fibonacci", "input_data": {"n": 101}}),
        json!({"algorithm_type": "prime_check", "input_data": {"number": 1}}),
        json!({"algorithm_type": "sorting", "input_data": {}}),
        json!({"algorithm_type": "quantum", "input_data": {}}),
        json!({"input_data": {}}),
    ];

    for case in &cases {
        let (status, body) = harness.send(process("u1", case)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "case {case}");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
    assert!(harness.store.is_empty());
}

#[tokio::test]
async fn test_routine_failure_is_400_and_recorded() {
    let harness = Harness::new();
    let (status, body) = harness
        .send(process(
            "u1",
            &json!({
                "algorithm_type": "matrix_multiply",
                "input_data": {"matrix_a": [[1, 2]], "matrix_b": [[1, 2]]}
            }),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Algorithm processing failed:")
    );

    let rows = harness.store.rows("algorithm_requests");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], "failed");
}

#[tokio::test]
async fn test_store_outage_is_503() {
    let harness = Harness::new();
    harness
        .store
        .fail_on(StoreOperation::Create, StorageError::Unavailable("down".into()));

    let (status, body) = harness
        .send(process("u1", &json!({"algorithm_type": "fibonacci", "input_data": {"n": 3}})))
        .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_history_is_scoped_filtered_and_limited() {
    let harness = Harness::new();
    for body in [
        json!({"algorithm_type": "fibonacci", "input_data": {"n": 5}}),
        json!({"algorithm_type": "sorting", "input_data": {"array": [3, 1, 2]}}),
        json!({"algorithm_type": "fibonacci", "input_data": {"n": 6}}),
    ] {
        assert_eq!(harness.send(process("u1", &body)).await.0, StatusCode::OK);
    }
    harness
        .send(process("u2", &json!({"algorithm_type": "fibonacci", "input_data": {"n": 1}})))
        .await;

    let (status, all) = harness.send(get("/api/v1/algorithms/history", Some("u1"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);
    assert!(all.as_array().unwrap().iter().all(|row| row["user_id"] == "u1"));

    let (_, limited) = harness
        .send(get("/api/v1/algorithms/history?limit=2", Some("u1")))
        .await;
    assert_eq!(limited.as_array().unwrap().len(), 2);

    let (_, sorting) = harness
        .send(get("/api/v1/algorithms/history?algorithm_type=sorting", Some("u1")))
        .await;
    assert_eq!(sorting.as_array().unwrap().len(), 1);
    assert_eq!(sorting[0]["result"]["sorted"], json!([1, 2, 3]));
}

#[tokio::test]
async fn test_history_rejects_bad_query() {
    let harness = Harness::new();
    for uri in [
        "/api/v1/algorithms/history?limit=0",
        "/api/v1/algorithms/history?limit=101",
        "/api/v1/algorithms/history?limit=abc",
        "/api/v1/algorithms/history?algorithm_type=quantum",
    ] {
        let (status, _) = harness.send(get(uri, Some("u1"))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
    }
}

#[tokio::test]
async fn test_single_request_is_owner_only() {
    let harness = Harness::new();
    let (_, created) = harness
        .send(process("u1", &json!({"algorithm_type": "prime_check", "input_data": {"number": 7}})))
        .await;
    let uri = format!(
        "/api/v1/algorithms/requests/{}",
        created["request_id"].as_str().unwrap()
    );

    let (status, own) = harness.send(get(&uri, Some("u1"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own["result"]["is_prime"], true);

    let (status, _) = harness.send(get(&uri, Some("u2"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = harness
        .send(get("/api/v1/algorithms/requests/not-a-uuid", Some("u1")))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_stats() {
    let harness = Harness::new();
    harness
        .send(process("u1", &json!({"algorithm_type": "fibonacci", "input_data": {"n": 5}})))
        .await;
    harness
        .send(process(
            "u1",
            &json!({
                "algorithm_type": "matrix_multiply",
                "input_data": {"matrix_a": [[1]], "matrix_b": [[1], [2]]}
            }),
        ))
        .await;

    let (status, stats) = harness.send(get("/api/v1/algorithms/stats", Some("u1"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({
            "total_requests": 2,
            "completed_requests": 1,
            "failed_requests": 1,
            "algorithm_usage": {"fibonacci": 1, "matrix_multiply": 1}
        })
    );

    let (_, empty) = harness.send(get("/api/v1/algorithms/stats", Some("nobody"))).await;
    assert_eq!(empty["total_requests"], 0);
    assert_eq!(empty["algorithm_usage"], json!({}));
}

#[tokio::test]
async fn test_me_returns_caller() {
    let (status, body) = Harness::new().send(get("/api/v1/auth/me", Some("u9"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "u9");
    assert_eq!(body["email"], "u9@example.com");
}

#[tokio::test]
async fn test_metrics_disabled_is_503() {
    let (status, _) = Harness::new().send(get("/metrics", None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
