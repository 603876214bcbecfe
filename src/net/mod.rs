//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig(host, port)
//!     → listener.rs (resolve, bind, hand to Tokio)
//!     → Hand off to the HTTP layer (axum::serve)
//! ```

pub mod listener;
