//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, interval ordering)
//! - Check addresses and levels parse before start-up
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: VerifierConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::VerifierConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("endpoint.socket_path must be an absolute path, got {0:?}")]
    SocketPath(String),

    #[error("backoff.max_interval_ms ({max}) is smaller than backoff.initial_interval_ms ({initial})")]
    IntervalOrder { initial: u64, max: u64 },

    #[error("backoff.multiplier must be at least 1.0, got {0}")]
    Multiplier(f64),

    #[error("backoff.jitter_ratio must be in [0.0, 1.0), got {0}")]
    Jitter(f64),

    #[error("unknown observability.log_level {0:?}")]
    LogLevel(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

pub fn validate_config(config: &VerifierConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let socket_path = &config.endpoint.socket_path;
    if socket_path.is_empty() || !Path::new(socket_path).is_absolute() {
        errors.push(ValidationError::SocketPath(socket_path.clone()));
    }

    for (field, value) in [
        ("endpoint.query_timeout_ms", config.endpoint.query_timeout_ms),
        ("timeouts.reload_ms", config.timeouts.reload_ms),
        ("backoff.initial_interval_ms", config.backoff.initial_interval_ms),
        ("backoff.max_interval_ms", config.backoff.max_interval_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    let backoff = &config.backoff;
    if backoff.max_interval_ms > 0 && backoff.max_interval_ms < backoff.initial_interval_ms {
        errors.push(ValidationError::IntervalOrder {
            initial: backoff.initial_interval_ms,
            max: backoff.max_interval_ms,
        });
    }
    if backoff.multiplier.is_nan() || backoff.multiplier < 1.0 {
        errors.push(ValidationError::Multiplier(backoff.multiplier));
    }
    if !(0.0..1.0).contains(&backoff.jitter_ratio) {
        errors.push(ValidationError::Jitter(backoff.jitter_ratio));
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.as_str()) {
        errors.push(ValidationError::LogLevel(observability.log_level.clone()));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
