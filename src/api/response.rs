//! API response helpers

use std::fmt::Display;

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;

/// Hold data for a successful API interaction
///
/// The data is serialized as-is, without a wrapper
pub struct Success<V>
where
    V: Serialize,
{
    status_code: StatusCode,
    data: V,
}

impl<V> Success<V>
where
    V: Serialize,
{
    pub fn ok(data: V) -> Self {
        Self {
            status_code: StatusCode::OK,
            data,
        }
    }

    pub fn created(data: V) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            data,
        }
    }
}

impl<V> IntoResponse for Success<V>
where
    V: Serialize,
{
    fn into_response(self) -> Response {
        (self.status_code, Json(self.data)).into_response()
    }
}

/// Acknowledgement of a write, `{ "Message": "...", "id": 1 }`
#[derive(Debug, Serialize)]
pub struct Acknowledgement {
    #[serde(rename = "Message")]
    pub message: &'static str,

    pub id: i64,
}

/// Hold data for a failed API interaction
#[derive(Debug)]
pub struct Error {
    status_code: StatusCode,
    message: String,
    description: Option<String>,
}

impl Error {
    pub fn bad_request<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code: StatusCode::BAD_REQUEST,
            message: message.to_string(),
            description: None,
        }
    }

    /// Required input is missing or empty
    pub fn invalid_input() -> Self {
        Self::bad_request("Invalid input")
    }

    /// The path is not one of the known endpoints
    pub fn invalid_path() -> Self {
        Self {
            status_code: StatusCode::NOT_ACCEPTABLE,
            message: "Invalid path".to_string(),
            description: None,
        }
    }

    /// Log what went wrong, answer with a fixed message
    ///
    /// The details of `err` never reach the client
    pub fn internal_server_error<E>(context: &str, err: E) -> Self
    where
        E: Display,
    {
        tracing::error!("{context}: {err}");

        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description<M>(self, description: M) -> Self
    where
        M: ToString,
    {
        Self {
            description: Some(description.to_string()),
            ..self
        }
    }
}

#[derive(Serialize)]
struct ErrorWrapper {
    #[serde(rename = "Error")]
    error: String,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code,
            Json(ErrorWrapper {
                error: self.message,
                description: self.description,
            }),
        )
            .into_response()
    }
}
