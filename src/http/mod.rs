//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, tracing, request ID, timeout)
//!     → /readyz            → fixed 200 "ok"
//!     → /_control/handlers → control.rs (JSON → registry)
//!     → anything else      → routing::dispatch
//!                              → middleware.rs chain → handler.rs
//! ```

pub mod control;
pub mod handler;
pub mod middleware;
pub mod request;
pub mod server;

pub use control::{ControlError, RouteSpec};
pub use handler::Handler;
pub use middleware::{chain, Middleware, Next};
pub use request::{StubRequestId, X_REQUEST_ID};
pub use server::StubServer;
