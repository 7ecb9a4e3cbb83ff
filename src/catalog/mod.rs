//! Service catalog subsystem.
//!
//! # Data Flow
//! ```text
//! Management request (create / replace / update / delete / set health)
//!     → registry.rs (look up or create the Service)
//!     → service.rs (mutate hosts, routes, strategy under the service lock)
//!
//! Forwarding request (service, route)
//!     → registry.rs (look up Service)
//!     → service.rs (resolve route, pick host via load_balancer)
//!     → decision.rs (Success / RouteNotFound / NoHealthyHost)
//!
//! Snapshot (snapshot.rs)
//!     JSON file ⇄ CatalogConfig ⇄ ServiceCatalog
//! ```
//!
//! # Design Decisions
//! - The catalog is an owned value, shared by handle; no global registry
//! - Per-service locking, never a catalog-wide lock around selection
//! - "No healthy host" is a decision, not an error

pub mod decision;
pub mod error;
pub mod registry;
pub mod service;
pub mod snapshot;

pub use decision::ForwardingDecision;
pub use error::{CatalogError, ErrorKind};
pub use registry::{ServiceCatalog, ServiceUpdate, SharedService};
pub use service::{Service, ServiceDetails};
pub use snapshot::{ensure_snapshot, load_catalog, save_catalog, SnapshotError};
