//! Host health state derived from reported status codes.
//!
//! # States
//! - Healthy: last reported status is exactly 200, host receives traffic
//! - Sick: any other status, host excluded from selection but kept in the table
//!
//! # Design Decisions
//! - Health is reported externally, never polled
//! - Out-of-range codes are rejected, not clamped

use serde::Serialize;
use thiserror::Error;

/// The only status code that counts as healthy.
pub const HEALTHY_STATUS: u16 = 200;

/// Lowest status code accepted for a host.
pub const MIN_STATUS: i64 = 1;

/// Highest status code accepted for a host.
pub const MAX_STATUS: i64 = 599;

/// Reported health of a single host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostHealth {
    Healthy,
    Sick,
}

impl HostHealth {
    /// Classify a stored status code.
    pub fn from_status(status: u16) -> Self {
        if status == HEALTHY_STATUS {
            HostHealth::Healthy
        } else {
            HostHealth::Sick
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HostHealth::Healthy => "healthy",
            HostHealth::Sick => "sick",
        }
    }
}

impl std::fmt::Display for HostHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the health table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HealthError {
    /// Status code outside `[1, 599]`.
    #[error("Status code must be between 1 and 599, got {0}")]
    InvalidStatus(i64),

    /// Host is not part of the table.
    #[error("Unknown host {0}")]
    UnknownHost(String),
}

/// Validate a reported status code and narrow it to its stored form.
pub fn validate_status(status: i64) -> Result<u16, HealthError> {
    if (MIN_STATUS..=MAX_STATUS).contains(&status) {
        // Range check above guarantees the value fits.
        Ok(status as u16)
    } else {
        Err(HealthError::InvalidStatus(status))
    }
}
