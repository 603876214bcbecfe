//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that built-in endpoint paths are usable and distinct
//! - Check preloaded routes the same way the control plane would
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StubConfig → Result<(), Vec<ValidationError>>

use std::net::IpAddr;

use thiserror::Error;

use crate::config::schema::StubConfig;
use crate::routing::matcher::is_templated;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.host {0:?} is not an IP address")]
    InvalidHost(String),

    #[error("{field} {path:?} must start with '/' and must not contain ':'")]
    InvalidEndpointPath { field: &'static str, path: String },

    #[error("control.path and readiness.path must differ")]
    EndpointCollision,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("routes[{index}]: {reason}")]
    InvalidRoute { index: usize, reason: String },
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &StubConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = server_errors(config);

    for (index, route) in config.routes.iter().enumerate() {
        if let Err(e) = route.validate() {
            errors.push(ValidationError::InvalidRoute {
                index,
                reason: e.to_string(),
            });
        }
    }

    into_result(errors)
}

/// Validate everything a server needs to serve, ignoring preloaded routes.
pub fn validate_server(config: &StubConfig) -> Result<(), Vec<ValidationError>> {
    into_result(server_errors(config))
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn server_errors(config: &StubConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.listener.host.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::InvalidHost(config.listener.host.clone()));
    }

    let endpoints = [
        ("readiness.path", &config.readiness.path),
        ("control.path", &config.control.path),
    ];
    for (field, path) in endpoints {
        if !path.starts_with('/') || is_templated(path) {
            errors.push(ValidationError::InvalidEndpointPath {
                field,
                path: path.clone(),
            });
        }
    }

    if config.control.enabled && config.control.path == config.readiness.path {
        errors.push(ValidationError::EndpointCollision);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    errors
}
