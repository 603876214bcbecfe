//! Configurable in-process HTTP stub server.
//!
//! Register exact or templated routes, start a real TCP listener, point the
//! code under test at [`StubServer::url`], and close it when done.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::StubConfig;
pub use error::StubError;
pub use http::{chain, Handler, Middleware, Next, RouteSpec, StubServer};
pub use routing::{Registry, Resolution};
