//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Catalog, services and HTTP handlers produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through HTTP spans
//! - Metrics are cheap and recorded unconditionally

pub mod logging;
pub mod metrics;
