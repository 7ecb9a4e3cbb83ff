//! Service Load Balancer Library
//!
//! Management plane and request-routing core of a software load balancer:
//! register services, track per-host health, and pick a backend host for each
//! request with round-robin.

pub mod catalog;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;

pub use catalog::{CatalogError, ForwardingDecision, Service, ServiceCatalog, ServiceUpdate};
pub use config::{AppConfig, ServiceConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
