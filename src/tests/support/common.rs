// Common HTTP helpers: drive a router in-process without binding a socket.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Sends one request and returns the status plus the raw body.
pub async fn do_request(
    router: Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = router.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    (status, bytes.to_vec())
}

/// Sends one request and parses the body as JSON.
pub async fn do_json(
    router: Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = do_request(router, method, uri, body).await;
    let json = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("invalid JSON from {}: {} ({:?})", uri, e, String::from_utf8_lossy(&bytes)));
    (status, json)
}
