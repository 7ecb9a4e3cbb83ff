//! Response shaping for the management and forwarding API.
//!
//! # Responsibilities
//! - Map catalog and snapshot errors to HTTP status codes
//! - Produce the JSON bodies clients expect (`{"status": ...}`)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::catalog::{CatalogError, ErrorKind, SnapshotError};

/// Error returned by handlers, rendered as `{"status": message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let status = match err.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation | ErrorKind::AlreadyExists | ErrorKind::Configuration => {
                StatusCode::BAD_REQUEST
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<SnapshotError> for ApiError {
    fn from(err: SnapshotError) -> Self {
        tracing::error!(error = %err, "Snapshot operation failed");
        Self::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "status": self.message }))).into_response()
    }
}

/// `{"status": "success", "details": ...}`. Serialized straight from `T`,
/// so ordered maps in the details keep their order.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    status: &'static str,
    details: T,
}

pub fn success<T: Serialize>(details: T) -> Json<Success<T>> {
    Json(Success {
        status: "success",
        details,
    })
}
