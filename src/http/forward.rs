//! Forwarding endpoint.
//!
//! Resolves `/{service}/{route}` to a host and reports where the request
//! would go. No bytes are proxied to the backend.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::request::request_id;
use crate::http::response::ApiError;
use crate::http::server::AppState;

/// Any method on `/{service}/{*route}`.
pub async fn forward_request(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    Path((service, route)): Path<(String, String)>,
) -> Response {
    forward(&state, &method, &headers, &service, &route)
}

/// Any method on `/{service}` or `/{service}/`: the empty route, which a
/// service reaches by configuring `/`.
pub async fn forward_root(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    Path(service): Path<String>,
) -> Response {
    forward(&state, &method, &headers, &service, "")
}

fn forward(
    state: &AppState,
    method: &Method,
    headers: &HeaderMap,
    service: &str,
    route: &str,
) -> Response {
    let request_id = request_id(headers);

    let (status, message) = match state.catalog.forward(service, route) {
        Ok(decision) => {
            match decision.destination() {
                Some(destination) => tracing::info!(
                    request_id = %request_id,
                    method = %method,
                    service = %service,
                    destination = %destination,
                    "Forwarding request"
                ),
                None => tracing::warn!(
                    request_id = %request_id,
                    service = %service,
                    route = %route,
                    outcome = decision.outcome(),
                    "Request not forwarded"
                ),
            }
            let status = StatusCode::from_u16(decision.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, decision.describe(method.as_str()))
        }
        Err(err) => {
            tracing::warn!(request_id = %request_id, service = %service, "Unknown service");
            let err = ApiError::from(err);
            (err.status(), err.message().to_string())
        }
    };

    (
        status,
        Json(json!({ "status": status.as_u16(), "message": message })),
    )
        .into_response()
}
