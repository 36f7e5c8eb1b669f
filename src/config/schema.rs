//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resilience::backoff::BackoffPolicy;

/// Well-known socket the version endpoint listens on.
pub const DEFAULT_SOCKET_PATH: &str = "/var/lib/nginx/nginx-config-version.sock";

/// Root configuration for the reload verifier.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct VerifierConfig {
    /// Private version endpoint exposed by the proxy.
    pub endpoint: EndpointConfig,

    /// Overall verification budget.
    pub timeouts: TimeoutConfig,

    /// Retry schedule between version queries.
    pub backoff: BackoffConfig,

    /// Rendering options for the version endpoint block.
    pub template: TemplateConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl VerifierConfig {
    /// Backoff policy bounded by the configured reload timeout.
    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            initial_interval: Duration::from_millis(self.backoff.initial_interval_ms),
            max_interval: Duration::from_millis(self.backoff.max_interval_ms),
            max_elapsed_time: Duration::from_millis(self.timeouts.reload_ms),
            multiplier: self.backoff.multiplier,
            jitter_ratio: self.backoff.jitter_ratio,
        }
    }
}

/// Version endpoint location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Unix socket path shared with the proxy.
    pub socket_path: String,

    /// Upper bound for a single version query in milliseconds.
    pub query_timeout_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            socket_path: DEFAULT_SOCKET_PATH.to_string(),
            query_timeout_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Time allowed for the proxy to confirm a new version, in milliseconds.
    pub reload_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { reload_ms: 60_000 }
    }
}

/// Exponential backoff between version queries.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// First retry delay in milliseconds.
    pub initial_interval_ms: u64,

    /// Cap on a single retry delay in milliseconds.
    pub max_interval_ms: u64,

    /// Growth factor applied after every retryable outcome.
    pub multiplier: f64,

    /// Random extra delay as a fraction of the interval (0.0 disables).
    pub jitter_ratio: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 25,
            max_interval_ms: 500,
            multiplier: 2.0,
            jitter_ratio: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TemplateConfig {
    /// Emit `opentracing off;` in the version endpoint block.
    pub extra_module: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
