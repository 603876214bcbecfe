//! Error types for the stub server.

use thiserror::Error;

use crate::config::loader::join;
use crate::config::validation::ValidationError;

/// Errors raised by route registration and the server lifecycle.
#[derive(Debug, Error)]
pub enum StubError {
    /// The listener could not acquire the requested address.
    #[error("could not listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The configured host/port pair is not a usable socket address.
    #[error("invalid listen address {0:?}")]
    InvalidAddress(String),

    /// `start` was called on a server that is already running.
    #[error("stub server is already started")]
    AlreadyStarted,

    /// The server has been closed; it can neither start nor accept routes.
    #[error("stub server is closed")]
    Closed,

    /// `start` was called outside a Tokio runtime.
    #[error("stub server must be started from within a Tokio runtime")]
    NoRuntime,

    /// The server settings cannot be served (endpoint paths, timeouts, host).
    #[error("invalid stub configuration: {}", join(.0))]
    InvalidConfig(Vec<ValidationError>),

    /// The HTTP method could not be parsed.
    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),
}
