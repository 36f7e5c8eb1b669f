//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! SIGTERM/SIGINT → signals.rs
//!     → `serve`: graceful shutdown of the stand-in endpoint
//!     → `wait`: cancels the in-flight verification
//! ```

pub mod signals;

pub use signals::shutdown_signal;
