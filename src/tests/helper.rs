use axum::Router;
use axum::body::Body;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use http_body_util::BodyExt;
use serde_json::Value;
use serde_json::json;
use tower::Service;

use crate::create_router;
use crate::storage::Storage;
use crate::storage::memory::Memory;

/// Port shown on the status page during tests
pub const TEST_PORT: u16 = 3000;

/// Setup the app on top of a memory storage with a few countries
///
/// The storage is returned as well, to inspect what was written
pub fn setup_test_app() -> (Router, Memory) {
    let memory = Memory::with_countries(&[("ES", "Spain"), ("IT", "Italy"), ("FR", "France")]);

    (setup_test_app_with_storage(memory.clone()), memory)
}

/// Setup the app on top of any storage
pub fn setup_test_app_with_storage<S: Storage>(storage: S) -> Router {
    create_router(storage, TEST_PORT)
}

/// Send a request, optionally with a JSON body, get the status and raw body back
pub async fn send_text(
    app: &mut Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
    with_content_type: bool,
) -> (StatusCode, String) {
    let mut request = Request::builder().method(method).uri(uri);

    if with_content_type {
        request = request.header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    }

    let request = request
        .body(body.map_or_else(Body::empty, |body| Body::from(body.to_string())))
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (status_code, String::from_utf8_lossy(&body[..]).to_string())
}

/// Send a request with an optional JSON body, get the status and JSON body back
pub async fn send(
    app: &mut Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let body = body.map(|body| body.to_string());
    let (status_code, body) =
        send_text(app, method, uri, body.as_deref(), body.is_some()).await;

    (status_code, serde_json::from_str(&body).unwrap())
}

pub async fn maybe_create_destination(app: &mut Router, payload: Value) -> (StatusCode, Value) {
    send(app, Method::POST, "/destinations/create", Some(payload)).await
}

/// Create a destination that is expected to succeed, returns its ID
pub async fn create_destination(
    app: &mut Router,
    name: &str,
    description: &str,
    country_code: &str,
    kind: &str,
) -> i64 {
    let (status_code, body) = maybe_create_destination(
        app,
        json!({
            "name": name,
            "description": description,
            "country_code": country_code,
            "type": kind,
        }),
    )
    .await;

    assert_eq!(StatusCode::CREATED, status_code);
    assert_eq!("Destination created", body["Message"]);

    body["id"].as_i64().unwrap()
}

/// Seed the usual set of destinations
///
/// 1. Ibiza, ES
/// 2. Lake Como, IT
/// 3. Paris, FR
/// 4. Atlantis, XX (unknown country)
pub async fn create_destinations(app: &mut Router) {
    create_destination(app, "Ibiza", "Island with beaches", "ES", "beach").await;
    create_destination(app, "Lake Como", "Quiet lake", "IT", "lake").await;
    create_destination(app, "Paris", "City of light", "FR", "city").await;
    create_destination(app, "Atlantis", "Sunken city", "XX", "city").await;
}

/// List destinations with a query string, `query` without the leading `?`
pub async fn list_destinations(app: &mut Router, query: &str) -> (StatusCode, Value) {
    send(app, Method::GET, &format!("/destinations?{query}"), None).await
}

/// The IDs of a listing response
pub fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect()
}

/// The `Error` message of an error response
pub fn error_message(body: &Value) -> &str {
    body["Error"].as_str().unwrap()
}
