//! HTTP stub server setup and lifecycle.
//!
//! # Responsibilities
//! - Own the route registry and expose the registration API
//! - Create the axum Router (readiness, control plane, dispatch fallback)
//! - Wire up middleware (tracing, request ID, timeout)
//! - Bind the listener and serve on a background task
//! - Idempotent close with a bounded wait for the serving task

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::validation::validate_server;
use crate::config::StubConfig;
use crate::error::StubError;
use crate::http::control::{self, ControlError, RouteSpec};
use crate::http::handler::Handler;
use crate::http::middleware::Middleware;
use crate::http::request::{StubRequestId, X_REQUEST_ID};
use crate::lifecycle::Shutdown;
use crate::net::listener::{base_url, bind};
use crate::routing::dispatcher::status_response;
use crate::routing::{dispatch, Registry};

struct Running {
    local_addr: SocketAddr,
    base_url: String,
    shutdown: Shutdown,
    task: JoinHandle<()>,
}

enum ServerState {
    Idle,
    Running(Running),
    Closed { task: Option<JoinHandle<()>> },
}

/// An in-process HTTP stub.
///
/// ```ignore
/// let stub = StubServer::new(StubConfig::default());
/// stub.add_handler("GET", "/foo", Handler::new(|_req| async { "Foo" }), vec![])?;
/// stub.start()?;
/// let body = reqwest::get(format!("{}/foo", stub.url())).await?.text().await?;
/// stub.shutdown().await;
/// ```
pub struct StubServer {
    config: StubConfig,
    registry: Arc<Registry>,
    state: Mutex<ServerState>,
}

impl StubServer {
    /// Create a stub server. Routes listed in the config are registered now.
    pub fn new(config: StubConfig) -> Self {
        let registry = Arc::new(Registry::new());

        for spec in config.routes.iter().cloned() {
            let (method, path) = (spec.method.clone(), spec.path.clone());
            if let Err(e) = spec.register(&registry) {
                tracing::warn!(method = %method, path = %path, error = %e, "Skipping preloaded route");
            }
        }

        Self {
            config,
            registry,
            state: Mutex::new(ServerState::Idle),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a handler; see [`Registry::add_handler`].
    pub fn add_handler(
        &self,
        method: &str,
        path: &str,
        handler: Handler,
        middlewares: Vec<Middleware>,
    ) -> Result<(), StubError> {
        self.registry.add_handler(method, path, handler, middlewares)
    }

    /// Register a templated route; see [`Registry::add_templated_route`].
    pub fn add_templated_route(
        &self,
        method: &str,
        path: &str,
        query: std::collections::HashMap<String, String>,
        handler: Handler,
    ) -> Result<(), StubError> {
        self.registry.add_templated_route(method, path, query, handler)
    }

    /// Register a canned-response route, exactly as the control plane would.
    pub fn add_route(&self, spec: RouteSpec) -> Result<(), ControlError> {
        spec.register(&self.registry)
    }

    /// Shared handle to the registry, usable from inside handlers.
    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    pub fn config(&self) -> &StubConfig {
        &self.config
    }

    /// Build the axum Router serving this stub.
    ///
    /// Fails with [`StubError::InvalidConfig`] when the endpoint paths or
    /// timeouts cannot be served.
    pub fn router(&self) -> Result<Router, StubError> {
        validate_server(&self.config).map_err(StubError::InvalidConfig)?;
        Ok(build_router(&self.config, Arc::clone(&self.registry)))
    }

    /// Bind the configured address and start serving on the current Tokio runtime.
    pub fn start(&self) -> Result<(), StubError> {
        let mut state = self.lock_state();
        match *state {
            ServerState::Idle => {}
            ServerState::Running(_) => return Err(StubError::AlreadyStarted),
            ServerState::Closed { .. } => return Err(StubError::Closed),
        }

        let runtime = Handle::try_current().map_err(|_| StubError::NoRuntime)?;
        let app = self.router()?;
        let listener = bind(&self.config.listener)?;
        let local_addr = listener.local_addr().map_err(|source| StubError::Bind {
            addr: format!("{}:{}", self.config.listener.host, self.config.listener.port),
            source,
        })?;

        let shutdown = Shutdown::new();
        let signal = shutdown.signal();
        let task = runtime.spawn(async move {
            if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(signal).await {
                tracing::error!(error = %e, "Stub server stopped with error");
            }
            tracing::info!(address = %local_addr, "Stub server stopped");
        });

        let base_url = base_url(local_addr);
        tracing::info!(
            url = %base_url,
            exact_routes = self.registry.exact_route_count(),
            templated_routes = self.registry.templated_route_count(),
            "Stub server started"
        );

        *state = ServerState::Running(Running {
            local_addr,
            base_url,
            shutdown,
            task,
        });
        Ok(())
    }

    /// Stop accepting connections and refuse further registrations.
    ///
    /// Idempotent; does nothing on a server that was never started.
    pub fn close(&self) {
        let mut state = self.lock_state();
        match std::mem::replace(&mut *state, ServerState::Idle) {
            ServerState::Running(running) => {
                running.shutdown.trigger();
                self.registry.close();
                tracing::info!(url = %running.base_url, "Stub server closing");
                *state = ServerState::Closed {
                    task: Some(running.task),
                };
            }
            other => *state = other,
        }
    }

    /// Close, then wait for the serving task to release the listener.
    ///
    /// The task is aborted if it outlives `timeouts.shutdown_grace_secs`.
    pub async fn shutdown(&self) {
        self.close();

        let task = {
            let mut state = self.lock_state();
            match &mut *state {
                ServerState::Closed { task } => task.take(),
                _ => None,
            }
        };

        if let Some(mut task) = task {
            let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);
            if tokio::time::timeout(grace, &mut task).await.is_err() {
                tracing::warn!(grace_secs = grace.as_secs(), "Serving task still running, aborting");
                task.abort();
            }
        }
    }

    /// Base URL while running, empty otherwise.
    pub fn url(&self) -> String {
        match &*self.lock_state() {
            ServerState::Running(running) => running.base_url.clone(),
            _ => String::new(),
        }
    }

    /// Bound address while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match &*self.lock_state() {
            ServerState::Running(running) => Some(running.local_addr),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(*self.lock_state(), ServerState::Running(_))
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.close();
    }
}

/// Build the axum router with all middleware layers.
///
/// Expects a config that passed [`validate_server`].
fn build_router(config: &StubConfig, registry: Arc<Registry>) -> Router {
    let readiness_body = config.readiness.body.clone();
    let readiness = get(move || async move { readiness_body }).fallback(method_not_allowed);
    let mut router: Router<Arc<Registry>> = Router::new().route(&config.readiness.path, readiness);

    if config.control.enabled {
        router = router.route(
            &config.control.path,
            post(control::add_handler).fallback(method_not_allowed),
        );
    }

    router
        .fallback(dispatch_request)
        .with_state(registry)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.timeouts.request_secs),
        ))
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, StubRequestId))
}

async fn method_not_allowed() -> Response {
    status_response(StatusCode::METHOD_NOT_ALLOWED)
}

/// Fallback handler: everything that is not a built-in endpoint.
async fn dispatch_request(State(registry): State<Arc<Registry>>, request: Request<Body>) -> Response {
    dispatch(&registry, request).await
}
