//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! verify/waiter.rs produces:
//!     → logging.rs (structured events inside a per-verification span)
//!     → metrics.rs (query and verification counters, duration histogram)
//!
//! Consumers:
//!     → stderr (fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so rendered config on stdout stays clean
//! - Metrics go through the `metrics` facade; without an installed
//!   recorder they are no-ops

pub mod logging;
pub mod metrics;
