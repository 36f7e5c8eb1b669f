//! Reload verification subsystem.
//!
//! # Data Flow
//! ```text
//! control plane renders config version N → proxy reload signal
//!     → ReloadVerifier::wait_for_version(N) (waiter.rs)
//!         → VersionSource::current_version() (client.rs, GET /configVersion)
//!         → match: Succeeded
//!         → mismatch / query error: BackoffCursor delay, poll again
//!         → budget exhausted: TimedOut
//! ```
//!
//! # Design Decisions
//! - A single query never retries; retry policy lives only in the waiter
//! - Mismatches and query errors are equally retryable
//! - Each wait owns its cursor, so concurrent waits share nothing mutable

pub mod client;
pub mod error;
pub mod waiter;

pub use client::{VersionClient, VersionSource, CONFIG_VERSION_PATH};
pub use error::{AttemptError, QueryError, VerifyError, VersionMismatch};
pub use waiter::{ReloadVerifier, Verified, VerifyState};
