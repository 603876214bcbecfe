//! Control-plane route registration.
//!
//! A running stub accepts `POST` requests carrying a JSON [`RouteSpec`] and
//! turns each one into a canned-response route. The same shape is used for
//! routes preloaded from a config file.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::HeaderName, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::StubError;
use crate::http::handler::Handler;
use crate::routing::matcher::is_templated;
use crate::routing::Registry;

/// A canned-response route description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteSpec {
    pub method: String,
    pub path: String,
    /// Required query parameters (subset match).
    pub query: HashMap<String, String>,
    /// Response status; absent or `0` means `200`.
    pub status: Option<u16>,
    pub body: String,
    pub headers: HashMap<String, String>,
}

/// Reasons a control-plane payload is rejected.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("invalid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("method and path are required")]
    MissingField,

    #[error("invalid status code {0}")]
    InvalidStatus(u16),

    #[error("invalid header {0:?}")]
    InvalidHeader(String),

    #[error(transparent)]
    Registry(#[from] StubError),
}

impl IntoResponse for ControlError {
    fn into_response(self) -> Response {
        let status = match &self {
            ControlError::Registry(StubError::Closed) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

impl RouteSpec {
    /// Decode a JSON payload.
    pub fn from_json(payload: &[u8]) -> Result<Self, ControlError> {
        Ok(serde_json::from_slice(payload)?)
    }

    fn status_code(&self) -> Result<StatusCode, ControlError> {
        match self.status {
            None | Some(0) => Ok(StatusCode::OK),
            Some(code) => StatusCode::from_u16(code).map_err(|_| ControlError::InvalidStatus(code)),
        }
    }

    fn header_map(&self) -> Result<HeaderMap, ControlError> {
        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|_| ControlError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ControlError::InvalidHeader(name.to_string()))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Check the spec without registering it.
    pub fn validate(&self) -> Result<(), ControlError> {
        if self.method.trim().is_empty() || self.path.is_empty() {
            return Err(ControlError::MissingField);
        }
        self.status_code()?;
        self.header_map()?;
        Ok(())
    }

    /// The handler answering with this spec's status, headers and body.
    pub fn handler(&self) -> Result<Handler, ControlError> {
        Ok(Handler::static_response(
            self.status_code()?,
            self.header_map()?,
            self.body.clone(),
        ))
    }

    /// Whether this spec needs structural matching.
    pub fn is_templated(&self) -> bool {
        is_templated(&self.path) || !self.query.is_empty()
    }

    /// Validate and add this spec to `registry`.
    pub fn register(self, registry: &Registry) -> Result<(), ControlError> {
        self.validate()?;
        let handler = self.handler()?;

        if self.is_templated() {
            registry.add_templated_route(&self.method, &self.path, self.query, handler)?;
        } else {
            registry.add_handler(&self.method, &self.path, handler, Vec::new())?;
        }
        Ok(())
    }
}

/// `POST` handler for the control-plane endpoint.
pub async fn add_handler(State(registry): State<Arc<Registry>>, payload: Bytes) -> Response {
    match RouteSpec::from_json(&payload).and_then(|spec| spec.register(&registry)) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Rejected control-plane payload");
            e.into_response()
        }
    }
}
