//! Request metadata helpers.
//!
//! Request IDs are generated by `tower_http::request_id` (UUID v4) as early as
//! possible and echoed back on the response.

use axum::http::HeaderMap;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID of an incoming request, or `"unknown"` if absent.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
