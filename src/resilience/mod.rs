//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! wait_for_version():
//!     → BackoffPolicy::start() (fresh cursor per call)
//!     → query fails or mismatches → cursor.next_backoff()
//!     → Some(delay): sleep, query again
//!     → None: elapsed budget exhausted, verification times out
//! ```
//!
//! # Design Decisions
//! - Policy is an immutable value; the cursor is owned by one call
//! - Cursor measures time with tokio's clock so tests can pause it
//! - Intervals never exceed the configured cap, jitter included

pub mod backoff;

pub use backoff::{BackoffCursor, BackoffPolicy};
