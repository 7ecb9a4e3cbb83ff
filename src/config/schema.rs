//! Configuration schema definitions.
//!
//! Two shapes live here:
//! - `AppConfig`: server settings, read from TOML at startup
//! - `ServiceConfig` / `CatalogConfig`: the persisted service snapshot (JSON)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root configuration for the load balancer server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where the service snapshot lives and how it is saved.
    pub services: ServicesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Service snapshot settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// JSON file holding the service catalog.
    pub snapshot_path: String,

    /// Write an empty snapshot (`{}`) at startup if the file is missing.
    pub create_if_missing: bool,

    /// Copy the previous snapshot aside before overwriting it.
    pub backup_on_save: bool,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "config.json".to_string(),
            create_if_missing: true,
            backup_on_save: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Expose Prometheus metrics.
    pub metrics_enabled: bool,

    /// Address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Persisted definition of one service.
///
/// Also the body of create/replace requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Host identifiers in rotation order.
    pub hosts: Vec<String>,

    /// Routes accepted by the service.
    pub routes: Vec<String>,

    /// Informational health check path.
    #[serde(default)]
    pub healthcheck: Option<String>,

    /// Routing strategy tag.
    #[serde(default = "default_routing")]
    pub routing: String,
}

fn default_routing() -> String {
    "RR".to_string()
}

impl ServiceConfig {
    pub fn new<H, R>(hosts: H, routes: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
            routes: routes.into_iter().map(Into::into).collect(),
            healthcheck: None,
            routing: default_routing(),
        }
    }
}

/// Whole snapshot: service name -> definition, in creation order.
pub type CatalogConfig = IndexMap<String, ServiceConfig>;
