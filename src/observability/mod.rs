//! Observability subsystem.
//!
//! All subsystems emit `tracing` events with structured fields; the HTTP
//! layer adds a span per request and an `x-request-id` header.

pub mod logging;
