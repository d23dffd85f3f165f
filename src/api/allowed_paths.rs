//! Path allow-list
//!
//! Requests for any path outside the known endpoints are turned away before routing, no
//! matter the method

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::Error;

/// Every path the service answers to
pub const ALLOWED_PATHS: [&str; 7] = [
    "/",
    "/destinations",
    "/destination",
    "/countries",
    "/destinations/create",
    "/destinations/update",
    "/destinations/delete",
];

/// Is this path one of the known endpoints?
pub fn is_allowed(path: &str) -> bool {
    ALLOWED_PATHS.contains(&path)
}

/// Middleware rejecting unknown paths with `406 Not Acceptable`
pub async fn reject_unknown_paths(request: Request, next: Next) -> Response {
    let path = request.uri().path();

    if is_allowed(path) {
        next.run(request).await
    } else {
        tracing::debug!("Rejecting {} {path}", request.method());

        Error::invalid_path().into_response()
    }
}

/// Fallback for anything the router does not know
pub async fn invalid_path() -> Error {
    Error::invalid_path()
}
