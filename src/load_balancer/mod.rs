//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Route resolved for a service
//!     → health table yields healthy hosts (insertion order)
//!     → RoutingStrategy::pick_host:
//!         - round_robin.rs (rotate through healthy hosts)
//!     → Selected host or None (no healthy backend)
//! ```
//!
//! # Design Decisions
//! - Strategies only see the healthy candidate list, never the health table
//! - Strategy state (e.g. the rotation cursor) lives in the strategy instance
//! - One strategy instance per service, serialized by the service lock
//! - Strategy tags are parsed up front; unsupported tags never reach selection

pub mod round_robin;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use round_robin::RoundRobin;

/// Host selection algorithm for one service.
pub trait RoutingStrategy: Send + fmt::Debug {
    /// Which algorithm this is.
    fn kind(&self) -> RoutingKind;

    /// Pick one host out of the healthy candidates.
    /// Returns `None` when there is nothing to pick from.
    fn pick_host<'a>(&mut self, healthy: &[&'a str]) -> Option<&'a str>;

    /// Forget any rotation state. Called when the host set is replaced wholesale.
    fn reset(&mut self) {}
}

/// Routing strategy tag as stored in configs and reported in details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoutingKind {
    #[default]
    RoundRobin,
}

impl RoutingKind {
    /// Wire tag used in configs and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingKind::RoundRobin => "RR",
        }
    }

    /// Build a fresh strategy instance with no rotation history.
    pub fn build(&self) -> Box<dyn RoutingStrategy> {
        match self {
            RoutingKind::RoundRobin => Box::new(RoundRobin::new()),
        }
    }
}

impl fmt::Display for RoutingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing tag that does not name a supported strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported routing strategy {0:?}. Currently only Round Robin (RR) is supported")]
pub struct UnsupportedStrategy(pub String);

impl FromStr for RoutingKind {
    type Err = UnsupportedStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RR" | "round_robin" | "RoundRobin" => Ok(RoutingKind::RoundRobin),
            other => Err(UnsupportedStrategy(other.to_string())),
        }
    }
}
