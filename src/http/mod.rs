//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs: /services management → catalog
//!     → forward.rs:  /{service}/{route}   → catalog → ForwardingDecision
//!     → response.rs (status codes, JSON bodies)
//! ```

pub mod forward;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{AppState, HttpServer};
