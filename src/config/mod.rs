//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! server config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!
//! service snapshot (JSON)
//!     → schema.rs (CatalogConfig / ServiceConfig)
//!     → catalog::snapshot (build ServiceCatalog, save it back)
//! ```
//!
//! # Design Decisions
//! - Server config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Service definitions are runtime state; the snapshot is only written on request

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, CatalogConfig, ListenerConfig, ObservabilityConfig, ServiceConfig, ServicesConfig,
    TimeoutConfig,
};
