//! Route storage.
//!
//! # Responsibilities
//! - Store exact routes keyed by (method, path)
//! - Store templated routes in registration order
//! - Reject registrations once the owning server is closed
//!
//! # Design Decisions
//! - One `RwLock` guards both collections; it is held only for a single
//!   insert or lookup, never while a handler runs
//! - Re-registering an exact key overwrites the previous entry
//! - Templated routes are append-only; earlier registrations win

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::http::Method;

use crate::error::StubError;
use crate::http::handler::Handler;
use crate::http::middleware::{chain, Middleware};
use crate::routing::matcher::{is_templated, PathTemplate};

/// Key of an exact route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub method: Method,
    pub path: String,
}

impl RouteKey {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

/// A terminal handler plus the middleware that wraps it.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    handler: Handler,
    middlewares: Vec<Middleware>,
}

impl RouteEntry {
    pub fn new(handler: Handler, middlewares: Vec<Middleware>) -> Self {
        Self {
            handler,
            middlewares,
        }
    }

    pub fn middlewares(&self) -> &[Middleware] {
        &self.middlewares
    }

    /// The handler with its middleware chain applied.
    pub fn compose(&self) -> Handler {
        chain(self.handler.clone(), &self.middlewares)
    }
}

/// A route matched structurally rather than by key.
#[derive(Debug, Clone)]
pub struct TemplatedRoute {
    pub method: Method,
    pub template: PathTemplate,
    pub query: HashMap<String, String>,
    pub entry: RouteEntry,
}

#[derive(Debug, Default)]
pub(crate) struct RouteTable {
    pub(crate) exact: HashMap<RouteKey, RouteEntry>,
    pub(crate) templated: Vec<TemplatedRoute>,
    closed: bool,
}

/// Thread-safe route registry owned by a stub server.
#[derive(Debug, Default)]
pub struct Registry {
    table: RwLock<RouteTable>,
}

/// Parse a method name case-insensitively.
pub fn parse_method(method: &str) -> Result<Method, StubError> {
    Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| StubError::InvalidMethod(method.to_string()))
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, RouteTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RouteTable>, StubError> {
        let table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if table.closed {
            return Err(StubError::Closed);
        }
        Ok(table)
    }

    /// Register a handler.
    ///
    /// Paths containing a parameter marker become templated routes without
    /// query constraints; everything else is stored as an exact route.
    pub fn add_handler(
        &self,
        method: &str,
        path: &str,
        handler: Handler,
        middlewares: Vec<Middleware>,
    ) -> Result<(), StubError> {
        let method = parse_method(method)?;
        let entry = RouteEntry::new(handler, middlewares);

        if is_templated(path) {
            self.push_templated(method, path, HashMap::new(), entry)
        } else {
            self.insert_exact(method, path, entry)
        }
    }

    /// Register a templated route with query constraints.
    ///
    /// Always stored as a templated route, even without a parameter marker,
    /// because exact lookup ignores the query string.
    pub fn add_templated_route(
        &self,
        method: &str,
        path: &str,
        query: HashMap<String, String>,
        handler: Handler,
    ) -> Result<(), StubError> {
        let method = parse_method(method)?;
        self.push_templated(method, path, query, RouteEntry::new(handler, Vec::new()))
    }

    fn insert_exact(&self, method: Method, path: &str, entry: RouteEntry) -> Result<(), StubError> {
        let key = RouteKey::new(method, path);
        tracing::debug!(method = %key.method, path = %key.path, "Handler added");
        let replaced = self.write()?.exact.insert(key, entry).is_some();
        if replaced {
            tracing::debug!(path, "Previous handler overwritten");
        }
        Ok(())
    }

    fn push_templated(
        &self,
        method: Method,
        path: &str,
        query: HashMap<String, String>,
        entry: RouteEntry,
    ) -> Result<(), StubError> {
        tracing::debug!(method = %method, path, query = ?query, "Template handler added");
        let route = TemplatedRoute {
            method,
            template: PathTemplate::parse(path),
            query,
            entry,
        };
        self.write()?.templated.push(route);
        Ok(())
    }

    /// Refuse all further registrations.
    pub fn close(&self) {
        self.table
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.read().closed
    }

    pub fn exact_route_count(&self) -> usize {
        self.read().exact.len()
    }

    pub fn templated_route_count(&self) -> usize {
        self.read().templated.len()
    }
}
