//! Startup orchestration.
//!
//! # Responsibilities
//! - Prepare and load the service snapshot
//! - Start the metrics exporter and its gauge refresh when enabled
//! - Build the HTTP server around the loaded catalog
//!
//! # Design Decisions
//! - Config errors are fatal; a broken snapshot is not (start empty, log it)
//! - Listeners are bound by the caller, after everything else is ready

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use crate::catalog::{ensure_snapshot, load_catalog, ServiceCatalog};
use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Load the catalog named by the config, falling back to an empty one.
pub fn load_services(config: &AppConfig) -> ServiceCatalog {
    let path = Path::new(&config.services.snapshot_path);

    if config.services.create_if_missing {
        if let Err(e) = ensure_snapshot(path) {
            tracing::error!(path = ?path, error = %e, "Failed to create service snapshot");
        }
    }

    match load_catalog(path) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(path = ?path, error = %e, "Error loading service snapshot, skipping");
            ServiceCatalog::new()
        }
    }
}

/// Initialize every subsystem and return a server ready to run.
pub fn build_server(config: AppConfig) -> HttpServer {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let catalog = Arc::new(load_services(&config));
    HttpServer::new(config, catalog)
}

/// Keep health gauges current while the server runs. Must be called inside
/// a Tokio runtime; does nothing when metrics are disabled.
pub fn spawn_metrics_refresh(server: &HttpServer, shutdown: &Shutdown) {
    if !server.config().observability.metrics_enabled {
        return;
    }
    tokio::spawn(metrics::run_refresh(
        server.catalog().clone(),
        metrics::GAUGE_REFRESH_INTERVAL,
        shutdown.subscribe(),
    ));
}
