//! Management API handlers (`/services`).

use std::path::PathBuf;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::catalog::{save_catalog, CatalogError, ServiceDetails, ServiceUpdate};
use crate::config::ServiceConfig;
use crate::health::state::HEALTHY_STATUS;
use crate::http::response::{success, ApiError, Success};
use crate::http::server::AppState;

/// Query string of the host health endpoint.
#[derive(Debug, Deserialize)]
pub struct HealthQuery {
    pub status: Option<i64>,
}

/// `GET /services`
pub async fn list_services(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "services": state.catalog.list() }))
}

/// `POST /services/save`
pub async fn save_services(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let catalog = state.catalog.clone();
    let path = PathBuf::from(&state.services.snapshot_path);
    let backup = state.services.backup_on_save;

    tokio::task::spawn_blocking(move || save_catalog(&catalog, &path, backup))
        .await
        .map_err(|e| ApiError::internal(format!("Snapshot task failed: {e}")))??;

    Ok(Json(json!({ "message": "success" })))
}

/// `GET /services/{name}`
pub async fn get_service(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ServiceDetails>, ApiError> {
    Ok(Json(state.catalog.get(&name)?))
}

/// `POST /services/{name}`: create only.
pub async fn create_service(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(config): Json<ServiceConfig>,
) -> Result<Json<Success<ServiceDetails>>, ApiError> {
    tracing::info!(service = %name, config = ?config, "Creating new service");
    let details = state.catalog.create(&name, &config)?;
    Ok(success(details))
}

/// `PUT /services/{name}`: create or overwrite.
pub async fn replace_service(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(config): Json<ServiceConfig>,
) -> Result<Json<Success<ServiceDetails>>, ApiError> {
    tracing::info!(service = %name, config = ?config, "Storing service");
    let details = state.catalog.replace(&name, &config)?;
    Ok(success(details))
}

/// `PATCH /services/{name}`: partial update.
pub async fn update_service(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(update): Json<ServiceUpdate>,
) -> Result<Json<Success<ServiceDetails>>, ApiError> {
    tracing::info!(service = %name, update = ?update, "Updating service");
    let details = state.catalog.update(&name, &update).map_err(|err| match err {
        CatalogError::ServiceNotFound(name) => ApiError::new(
            StatusCode::NOT_FOUND,
            format!("Service {name} does not exist. Please run PUT or POST to create this service"),
        ),
        other => other.into(),
    })?;
    Ok(success(details))
}

/// `DELETE /services/{name}`
pub async fn delete_service(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.catalog.delete(&name)?;
    Ok(Json(json!({ "status": "success" })))
}

/// `POST /services/{name}/{host}?status=N`
pub async fn set_host_health(
    State(state): State<AppState>,
    Path((name, host)): Path<(String, String)>,
    Query(query): Query<HealthQuery>,
) -> Result<Json<Success<Value>>, ApiError> {
    let status = query.status.unwrap_or(i64::from(HEALTHY_STATUS));
    state.catalog.set_host_health(&name, &host, status)?;
    Ok(success(json!({ "host": host, "status": status })))
}
