//! Middleware composition.
//!
//! A middleware decorates a [`Handler`] and returns a new one. The first
//! middleware of a list ends up outermost: its pre-handler code runs first
//! and its post-handler code runs last. A middleware that never calls
//! [`Next::run`] short-circuits everything inside it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};

use crate::http::handler::Handler;

type WrapFn = dyn Fn(Handler) -> Handler + Send + Sync;

/// A request-handling wrapper.
#[derive(Clone)]
pub struct Middleware {
    wrap: Arc<WrapFn>,
}

impl Middleware {
    /// Build from a raw decorator.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Handler) -> Handler + Send + Sync + 'static,
    {
        Self { wrap: Arc::new(f) }
    }

    /// Build from an async function receiving the request and the rest of the chain.
    pub fn from_fn<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request<Body>, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let f = Arc::new(f);
        Self::new(move |inner: Handler| {
            let f = Arc::clone(&f);
            Handler::new(move |req: Request<Body>| {
                f(req, Next { inner: inner.clone() })
            })
        })
    }

    /// Decorate `handler`.
    pub fn wrap(&self, handler: Handler) -> Handler {
        (self.wrap)(handler)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").finish_non_exhaustive()
    }
}

/// The remainder of a middleware chain.
#[derive(Debug)]
pub struct Next {
    inner: Handler,
}

impl Next {
    /// Pass the request on to the next middleware or the terminal handler.
    pub async fn run(self, req: Request<Body>) -> Response {
        self.inner.call(req).await
    }
}

/// Compose `middlewares` around `handler`, first element outermost.
pub fn chain(handler: Handler, middlewares: &[Middleware]) -> Handler {
    middlewares
        .iter()
        .rev()
        .fold(handler, |inner, middleware| middleware.wrap(inner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<&'static str>>>;

    fn recording(log: &Log, before: &'static str, after: &'static str) -> Middleware {
        let log = Arc::clone(log);
        Middleware::from_fn(move |req, next: Next| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(before);
                let res = next.run(req).await;
                log.lock().unwrap().push(after);
                res
            }
        })
    }

    fn terminal(log: &Log) -> Handler {
        let log = Arc::clone(log);
        Handler::new(move |_req| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push("handler");
                StatusCode::OK
            }
        })
    }

    #[tokio::test]
    async fn test_registration_order_in_reverse_order_out() {
        let log: Log = Arc::default();
        let composed = chain(
            terminal(&log),
            &[
                recording(&log, "m1-before", "m1-after"),
                recording(&log, "m2-before", "m2-after"),
            ],
        );

        let res = composed.call(Request::new(Body::empty())).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["m1-before", "m2-before", "handler", "m2-after", "m1-after"]
        );
    }

    #[tokio::test]
    async fn test_short_circuit_skips_inner_links() {
        let log: Log = Arc::default();
        let deny = Middleware::from_fn(|_req, _next: Next| async { StatusCode::UNAUTHORIZED });
        let composed = chain(
            terminal(&log),
            &[deny, recording(&log, "inner-before", "inner-after")],
        );

        let res = composed.call(Request::new(Body::empty())).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_chain_is_terminal_handler() {
        let log: Log = Arc::default();
        let composed = chain(terminal(&log), &[]);
        composed.call(Request::new(Body::empty())).await;
        assert_eq!(*log.lock().unwrap(), vec!["handler"]);
    }

    #[tokio::test]
    async fn test_raw_decorator_can_rewrite_request() {
        let tag = Middleware::new(|inner: Handler| {
            Handler::new(move |mut req: Request<Body>| {
                req.headers_mut()
                    .insert("x-tagged", "yes".parse().unwrap());
                inner.call(req)
            })
        });
        let echo = Handler::new(|req: Request<Body>| async move {
            req.headers()
                .get("x-tagged")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("no")
                .to_string()
        });

        let res = chain(echo, &[tag]).call(Request::new(Body::empty())).await;
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"yes");
    }
}
