// Response writers shared by the controllers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

/// Serializes `body` as JSON with the given status.
pub fn write_json<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_string(body) {
        Ok(json) => (status, [("content-type", CONTENT_TYPE_JSON)], json).into_response(),
        Err(e) => write_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to serialize response: {}", e),
        ),
    }
}

/// Writes `{"success": false, "error": ...}`.
pub fn write_error(status: StatusCode, error: impl Into<String>) -> Response {
    let body = serde_json::json!({
        "success": false,
        "error": error.into(),
    });
    (status, [("content-type", CONTENT_TYPE_JSON)], body.to_string()).into_response()
}

pub fn write_text(status: StatusCode, body: String) -> Response {
    (status, [("content-type", CONTENT_TYPE_TEXT)], body).into_response()
}
