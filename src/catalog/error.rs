//! Catalog error definitions.

use thiserror::Error;

use crate::health::HealthError;
use crate::load_balancer::UnsupportedStrategy;

/// Broad class of a catalog failure, used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    AlreadyExists,
    Configuration,
}

/// Errors that can occur while managing or querying services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Host status code outside `[1, 599]`.
    #[error("Status code must be between 1 and 599, got {0}")]
    InvalidStatus(i64),

    /// Host set that cannot be applied.
    #[error("Invalid host set for {service}: {reason}")]
    InvalidHosts { service: String, reason: String },

    #[error("Unknown service {0}")]
    ServiceNotFound(String),

    #[error("Unknown host for {service}: {host}")]
    HostNotFound { service: String, host: String },

    #[error("Unknown route for {service}: {route}")]
    RouteNotFound { service: String, route: String },

    #[error("Service {0} already exists. Overwrite with PUT request or update with PATCH")]
    AlreadyExists(String),

    #[error(transparent)]
    UnsupportedRouting(#[from] UnsupportedStrategy),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::InvalidStatus(_) | CatalogError::InvalidHosts { .. } => {
                ErrorKind::Validation
            }
            CatalogError::ServiceNotFound(_)
            | CatalogError::HostNotFound { .. }
            | CatalogError::RouteNotFound { .. } => ErrorKind::NotFound,
            CatalogError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            CatalogError::UnsupportedRouting(_) => ErrorKind::Configuration,
        }
    }

    /// Attach the owning service to a health table error.
    pub(crate) fn from_health(service: &str, err: HealthError) -> Self {
        match err {
            HealthError::InvalidStatus(status) => CatalogError::InvalidStatus(status),
            HealthError::UnknownHost(host) => CatalogError::HostNotFound {
                service: service.to_string(),
                host,
            },
        }
    }
}
