//! Request dispatch.
//!
//! # Data Flow
//! ```text
//! Request(method, percent-decoded path, query)
//!     → exact lookup by (method, path)
//!     → templated scan in registration order (method, path, query)
//!     → on miss: does any route match the path under another method?
//!         yes → 405 Method Not Allowed
//!         no  → 404 Not Found
//! ```
//!
//! # Design Decisions
//! - Exact routes beat templated routes regardless of registration order
//! - The registry lock covers resolution only; the handler runs after it is released
//! - Classifying a miss rescans every route, which is fine at stub scale

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
};

use percent_encoding::percent_decode_str;

use crate::http::handler::Handler;
use crate::routing::matcher::{query_match, QueryParams};
use crate::routing::registry::{parse_method, Registry, RouteKey};

/// Outcome of resolving a request against the registry.
#[derive(Debug)]
pub enum Resolution {
    /// A route matched; holds its middleware-wrapped handler.
    Matched(Handler),
    /// The path is known, but not under this method.
    MethodNotAllowed,
    NotFound,
}

impl Registry {
    /// Resolve a request to a handler or a failure classification.
    pub fn resolve(&self, method: &Method, path: &str, query: Option<&str>) -> Resolution {
        let query = QueryParams::parse(query);

        let entry = {
            let table = self.read();

            let key = RouteKey::new(method.clone(), path);
            if let Some(entry) = table.exact.get(&key) {
                Some(entry.clone())
            } else if let Some(route) = table.templated.iter().find(|route| {
                route.method == *method
                    && route.template.matches(path)
                    && query_match(&route.query, &query)
            }) {
                Some(route.entry.clone())
            } else {
                let path_known = table.exact.keys().any(|key| key.path == path)
                    || table.templated.iter().any(|route| {
                        route.template.matches(path) && query_match(&route.query, &query)
                    });
                if path_known {
                    return Resolution::MethodNotAllowed;
                }
                None
            }
        };

        match entry {
            Some(entry) => Resolution::Matched(entry.compose()),
            None => Resolution::NotFound,
        }
    }
}

/// Percent-decode a request path; invalid UTF-8 leaves it as sent.
pub fn decode_path(raw: &str) -> String {
    match percent_decode_str(raw).decode_utf8() {
        Ok(path) => path.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// Resolve and execute `req`.
pub async fn dispatch(registry: &Registry, req: Request<Body>) -> Response {
    let method = parse_method(req.method().as_str()).unwrap_or_else(|_| req.method().clone());
    let path = decode_path(req.uri().path());

    match registry.resolve(&method, &path, req.uri().query()) {
        Resolution::Matched(handler) => {
            tracing::debug!(method = %method, path = %path, "Route matched");
            handler.call(req).await
        }
        Resolution::MethodNotAllowed => {
            tracing::debug!(method = %method, path = %path, "Method not allowed");
            status_response(StatusCode::METHOD_NOT_ALLOWED)
        }
        Resolution::NotFound => {
            tracing::debug!(method = %method, path = %path, "No route matched");
            status_response(StatusCode::NOT_FOUND)
        }
    }
}

/// A bodyless failure carrying only the canonical status text.
pub(crate) fn status_response(status: StatusCode) -> Response {
    (status, status.canonical_reason().unwrap_or_default()).into_response()
}
