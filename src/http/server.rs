//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with management and forwarding handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{any, get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::catalog::ServiceCatalog;
use crate::config::{AppConfig, ServicesConfig};
use crate::http::forward::{forward_request, forward_root};
use crate::http::handlers::{
    create_service, delete_service, get_service, list_services, replace_service, save_services,
    set_host_health, update_service,
};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ServiceCatalog>,
    pub services: Arc<ServicesConfig>,
}

/// HTTP server for the load balancer API.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    catalog: Arc<ServiceCatalog>,
}

impl HttpServer {
    /// Create a new HTTP server serving `catalog`.
    pub fn new(config: AppConfig, catalog: Arc<ServiceCatalog>) -> Self {
        let state = AppState {
            catalog: catalog.clone(),
            services: Arc::new(config.services.clone()),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            catalog,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/services", get(list_services))
            .route("/services/save", post(save_services))
            .route(
                "/services/{name}",
                get(get_service)
                    .post(create_service)
                    .put(replace_service)
                    .patch(update_service)
                    .delete(delete_service),
            )
            .route("/services/{name}/{host}", post(set_host_health))
            .route("/{service}", any(forward_root))
            .route("/{service}/", any(forward_root))
            .route("/{service}/{*route}", any(forward_request))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Router with state applied, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            services = self.catalog.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<ServiceCatalog> {
        &self.catalog
    }
}
