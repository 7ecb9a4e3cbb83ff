//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Load snapshot → Metrics → Build server
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then catalog, then listener
//! - The snapshot is never written on shutdown; saving is explicit

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
