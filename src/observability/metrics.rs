//! Metrics collection and exposition.
//!
//! # Metrics
//! - `reload_verify_queries_total` (counter): version queries by result
//! - `reload_verify_total` (counter): finished verifications by outcome
//! - `reload_verify_duration_seconds` (histogram): time to outcome

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    ::metrics::describe_counter!(
        "reload_verify_queries_total",
        "Config version queries issued to the proxy"
    );
    ::metrics::describe_counter!(
        "reload_verify_total",
        "Finished config version verifications"
    );
    ::metrics::describe_histogram!(
        "reload_verify_duration_seconds",
        "Time from first query to verification outcome"
    );

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_query(success: bool) {
    let result = if success { "ok" } else { "error" };
    ::metrics::counter!("reload_verify_queries_total", "result" => result).increment(1);
}

pub fn record_verification(outcome: &'static str, elapsed: Duration) {
    ::metrics::counter!("reload_verify_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("reload_verify_duration_seconds", "outcome" => outcome)
        .record(elapsed.as_secs_f64());
}
