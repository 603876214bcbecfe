//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! start():  bind listener → spawn serving task (waits on Shutdown)
//! close():  Shutdown::trigger → serving task stops accepting → listener dropped
//! ```
//!
//! # Design Decisions
//! - Shutdown is idempotent: only the first trigger has an effect
//! - In-flight handlers are not cancelled; they finish on their own tasks

pub mod shutdown;

pub use shutdown::Shutdown;
