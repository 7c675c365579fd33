//! HTTP Gateway Tests
//!
//! Drives the full router (middleware included) with `tower::ServiceExt::oneshot`.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

#[path = "support/services.rs"]
mod test_service_support;
use test_service_support::{test_router, test_services};

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn registration(username: &str, email: &str) -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "username": username,
        "email": email,
        "phone": "555-0101",
        "password": "correct horse"
    })
}

fn event_body(total_slots: i32) -> Value {
    json!({
        "event_title": "Hack night",
        "event_description": "Bring a laptop",
        "event_location": "Lab 3",
        "event_date": "2025-11-20",
        "event_start_time": "18:30",
        "event_end_time": "22:00",
        "created_by": "user-1",
        "total_slots": total_slots
    })
}

#[tokio::test]
async fn register_login_profile_flow() {
    let services = test_services();
    let router = test_router(&services);

    let (status, body) = send(
        &router,
        Method::POST,
        "/v1/users/register",
        Some(registration("ada", "ada@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &router,
        Method::POST,
        "/v1/users/login",
        Some(json!({"username": "ada", "password": "correct horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user_id"], id.as_str());

    let (status, body) = send(&router, Method::GET, &format!("/v1/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ada");
    assert!(body.get("password_verifier").is_none());
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let services = test_services();
    let router = test_router(&services);

    send(
        &router,
        Method::POST,
        "/v1/users/register",
        Some(registration("ada", "ada@example.com")),
    )
    .await;
    let (status, body) = send(
        &router,
        Method::POST,
        "/v1/users/register",
        Some(registration("grace", "ada@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ENTITY_ALREADY_EXISTS");
}

#[tokio::test]
async fn failed_login_is_unauthorized() {
    let services = test_services();
    let router = test_router(&services);

    let (status, body) = send(
        &router,
        Method::POST,
        "/v1/users/login",
        Some(json!({"username": "ghost", "password": "boo"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid credentials");
}

#[tokio::test]
async fn create_event_on_both_paths() {
    let services = test_services();
    let router = test_router(&services);

    for path in ["/v1/event/create", "/v1/events"] {
        let (status, body) = send(&router, Method::POST, path, Some(event_body(10))).await;
        assert_eq!(status, StatusCode::CREATED, "path {}", path);
        assert_eq!(body["message"], "Event created successfully");
    }
    assert_eq!(services.store.event_count().await, 2);
}

#[tokio::test]
async fn event_details_use_fixed_formats() {
    let services = test_services();
    let router = test_router(&services);

    let (_, body) = send(&router, Method::POST, "/v1/events", Some(event_body(10))).await;
    let event_id = body["event_id"].as_str().unwrap().to_string();

    let (status, body) =
        send(&router, Method::GET, &format!("/v1/events/{}", event_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event_date"], "2025-11-20");
    assert_eq!(body["event_start_time"], "18:30:00");
    assert_eq!(body["event_end_time"], "22:00:00");
}

#[tokio::test]
async fn negative_slots_is_bad_request() {
    let services = test_services();
    let router = test_router(&services);

    let (status, _) = send(&router, Method::POST, "/v1/events", Some(event_body(-1))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(services.store.write_count(), 0);
}

#[tokio::test]
async fn unknown_event_is_not_found() {
    let services = test_services();
    let router = test_router(&services);

    let (status, body) = send(&router, Method::GET, "/v1/events/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "event not found");
}

#[tokio::test]
async fn readiness_follows_store_availability() {
    let services = test_services();
    let router = test_router(&services);

    let (status, body) = send(&router, Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    services.store.set_unavailable(true);
    let (status, body) = send(&router, Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn metrics_endpoint_is_exposed() {
    let services = test_services();
    let router = test_router(&services);

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn send_raw(router: &Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn null_slot_count_gets_json_error_body() {
    let services = test_services();
    let router = test_router(&services);

    let mut body = event_body(10);
    body["total_slots"] = Value::Null;
    let (status, body) = send(&router, Method::POST, "/v1/events", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["message"].is_string());
    assert_eq!(services.store.write_count(), 0);
}

#[tokio::test]
async fn malformed_json_gets_json_error_body() {
    let services = test_services();
    let router = test_router(&services);

    let (status, body) = send_raw(&router, "/v1/users/register", "{\"username\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    let (status, body) = send_raw(&router, "/v1/users/login", "[]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn over_wide_phone_is_bad_request() {
    let services = test_services();
    let router = test_router(&services);

    let mut body = registration("ada", "ada@example.com");
    body["phone"] = json!("1".repeat(40));
    let (status, body) = send(&router, Method::POST, "/v1/users/register", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(services.store.write_count(), 0);
}
