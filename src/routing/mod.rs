//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (any time before close):
//!     add_handler / add_templated_route
//!     → registry.rs (exact map or ordered template list)
//!
//! Incoming Request (method, path, query)
//!     → dispatcher.rs (exact lookup, then template scan)
//!     → matcher.rs (segment and query checks)
//!     → Return: composed handler, 405 or 404
//! ```
//!
//! # Design Decisions
//! - Routes are mutable at runtime behind a single lock
//! - Deterministic: exact first, then templates in registration order
//! - No specificity ranking between templates

pub mod dispatcher;
pub mod matcher;
pub mod registry;

pub use dispatcher::{dispatch, Resolution};
pub use registry::{Registry, RouteEntry, RouteKey, TemplatedRoute};
