//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lb_forward_total` (counter): forwarding decisions by service, outcome
//! - `lb_host_healthy` (gauge): 1=healthy, 0=sick, per service and host
//! - `lb_services` (gauge): number of services in the catalog
//!
//! Recording is a no-op until `init_metrics` installs the exporter.
//!
//! # Design Decisions
//! - Gauges expire after `GAUGE_IDLE_TIMEOUT` without an update
//! - Live gauges are republished every `GAUGE_REFRESH_INTERVAL`, so only
//!   removed hosts and services drop out of the exposition

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use metrics_util::MetricKindMask;
use tokio::sync::broadcast;

use crate::catalog::ServiceCatalog;

pub const GAUGE_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
pub const GAUGE_REFRESH_INTERVAL: Duration = Duration::from_secs(15);

/// Exporter builder with idle gauges expiring after `idle`.
pub fn builder(idle: Duration) -> PrometheusBuilder {
    PrometheusBuilder::new().idle_timeout(MetricKindMask::GAUGE, Some(idle))
}

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    builder(GAUGE_IDLE_TIMEOUT).with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Republish catalog gauges every `interval` until `shutdown` fires.
pub async fn run_refresh(
    catalog: Arc<ServiceCatalog>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => catalog.publish_metrics(),
            _ = shutdown.recv() => {
                tracing::debug!("Metrics refresh stopped");
                return;
            }
        }
    }
}

/// Count one forwarding attempt.
pub fn record_forward(service: &str, outcome: &'static str) {
    metrics::counter!(
        "lb_forward_total",
        "service" => service.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Publish the current health of a host.
pub fn record_host_health(service: &str, host: &str, healthy: bool) {
    metrics::gauge!(
        "lb_host_healthy",
        "service" => service.to_string(),
        "host" => host.to_string()
    )
    .set(if healthy { 1.0 } else { 0.0 });
}

/// Publish the catalog size.
pub fn record_service_count(count: usize) {
    metrics::gauge!("lb_services").set(count as f64);
}
