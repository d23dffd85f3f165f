use axum::http::Method;
use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_root() {
    let (mut app, _) = helper::setup_test_app();

    let (status_code, body) = helper::send_text(&mut app, Method::GET, "/", None, false).await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(body.contains(&format!("port {}", helper::TEST_PORT)));
    assert!(body.contains("Current time: "));
}
