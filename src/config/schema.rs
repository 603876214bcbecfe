//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::http::control::RouteSpec;
use crate::observability::logging::DEFAULT_FILTER;

/// Root configuration for a stub server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StubConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Control-plane endpoint.
    pub control: ControlConfig,

    /// Readiness probe endpoint.
    pub readiness: ReadinessConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Log filter.
    pub logging: LoggingConfig,

    /// Routes registered at construction time.
    pub routes: Vec<RouteSpec>,
}

impl StubConfig {
    /// Listen on `port` (`0` for an ephemeral port).
    pub fn with_port(mut self, port: u16) -> Self {
        self.listener.port = port;
        self
    }

    /// Listen on `host` (an IP literal).
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.listener.host = host.into();
        self
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// IP address to bind.
    pub host: String,

    /// Port to bind; `0` asks the OS for a free one.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }
}

/// Control-plane configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Serve the control-plane endpoint.
    pub enabled: bool,

    /// Path of the registration endpoint.
    pub path: String,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/_control/handlers".to_string(),
        }
    }
}

/// Readiness probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadinessConfig {
    pub path: String,
    pub body: String,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            path: "/readyz".to_string(),
            body: "ok".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// How long `shutdown` waits for the serving task before aborting it.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            shutdown_grace_secs: 5,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
        }
    }
}
