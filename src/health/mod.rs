//! Host health subsystem.
//!
//! # Data Flow
//! ```text
//! Health report (host, status code)
//!     → state.rs (validate code, classify healthy/sick)
//!     → table.rs (store per host, insertion ordered)
//!     → healthy candidate list handed to the load balancer
//! ```
//!
//! # Design Decisions
//! - Health is per-host, per-service
//! - A host is healthy iff its status code is exactly 200
//! - Sick hosts stay in the table and keep their rotation position

pub mod state;
pub mod table;

pub use state::{HealthError, HostHealth};
pub use table::HostHealthTable;
