use axum::http::Method;
use axum::http::StatusCode;
use serde_json::Value;

use crate::tests::helper;

async fn create_with_raw_body(body: &str, with_content_type: bool) -> (StatusCode, Value) {
    let (mut app, memory) = helper::setup_test_app();

    let (status_code, body) = helper::send_text(
        &mut app,
        Method::POST,
        "/destinations/create",
        Some(body),
        with_content_type,
    )
    .await;

    assert_eq!(0, memory.writes());

    (status_code, serde_json::from_str(&body).unwrap())
}

#[tokio::test]
async fn test_invalid_json() {
    // wrong data type
    let (status_code, error) = create_with_raw_body(r#"{"name": 1}"#, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Data error", helper::error_message(&error));
    assert!(
        error["Description"]
            .as_str()
            .unwrap()
            .starts_with("Failed to deserialize the JSON body into the target type")
    );

    // syntax error
    let (status_code, error) = create_with_raw_body(r#"{"}"#, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("JSON syntax error", helper::error_message(&error));
    assert!(error["Description"].is_string());

    // missing content type
    let (status_code, error) = create_with_raw_body(r"{}", false).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(
        "Missing `application/json` content type",
        helper::error_message(&error)
    );
    assert_eq!(Value::Null, error["Description"]);

    // valid JSON, but nothing in it
    let (status_code, error) = create_with_raw_body(r"{}", true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Invalid input", helper::error_message(&error));
}
