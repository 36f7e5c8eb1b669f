//! Polling loop that waits for the proxy to serve a given config version.
//!
//! # States
//! - Polling: querying the endpoint, backing off between attempts
//! - Succeeded: the endpoint reported the expected version
//! - TimedOut: the next attempt would start past the budget
//!
//! # State Transitions
//! ```text
//! Polling → Succeeded: observed version == expected
//! Polling → Polling: mismatch or query error, after the backoff delay
//! Polling → TimedOut: elapsed + next delay > timeout
//! ```
//!
//! Succeeded and TimedOut are terminal.

use std::future::Future;
use std::time::Duration;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::schema::{VerifierConfig, DEFAULT_SOCKET_PATH};
use crate::observability::metrics;
use crate::resilience::backoff::{BackoffCursor, BackoffPolicy};
use crate::verify::client::{VersionClient, VersionSource};
use crate::verify::error::{AttemptError, QueryError, VerifyError, VersionMismatch};
use crate::version::ConfigVersion;

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyState {
    Polling,
    Succeeded,
    TimedOut,
}

/// A confirmed version, with diagnostics about how long it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verified {
    pub version: ConfigVersion,
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Confirms that a running proxy has picked up a configuration version.
///
/// Cheap to share: waits take `&self` and keep all retry state on their own
/// stack, so any number of them may run concurrently.
#[derive(Debug, Clone)]
pub struct ReloadVerifier<S = VersionClient> {
    source: S,
    policy: BackoffPolicy,
    query_timeout: Duration,
}

impl ReloadVerifier<VersionClient> {
    /// Verifier for the well-known socket with the default backoff schedule.
    pub fn new(timeout: Duration) -> Self {
        Self::with_source(
            VersionClient::new(DEFAULT_SOCKET_PATH),
            BackoffPolicy::default().with_max_elapsed_time(timeout),
            DEFAULT_QUERY_TIMEOUT,
        )
    }

    pub fn from_config(config: &VerifierConfig) -> Self {
        Self::with_source(
            VersionClient::new(&config.endpoint.socket_path),
            config.backoff_policy(),
            Duration::from_millis(config.endpoint.query_timeout_ms),
        )
    }
}

impl<S: VersionSource> ReloadVerifier<S> {
    pub fn with_source(source: S, policy: BackoffPolicy, query_timeout: Duration) -> Self {
        Self {
            source,
            policy,
            query_timeout,
        }
    }

    /// Overall budget of every wait made through this verifier.
    pub fn timeout(&self) -> Duration {
        self.policy.max_elapsed_time
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// One query against the endpoint. Never retries.
    pub async fn query_current_version(&self) -> Result<ConfigVersion, QueryError> {
        self.query(self.query_timeout).await
    }

    async fn query(&self, limit: Duration) -> Result<ConfigVersion, QueryError> {
        let result = match tokio::time::timeout(limit, self.source.current_version()).await {
            Ok(result) => result,
            Err(_) => Err(QueryError::Timeout(limit)),
        };
        metrics::record_query(result.is_ok());
        result
    }

    /// Poll the endpoint until it reports `expected` or the timeout elapses.
    pub async fn wait_for_version(&self, expected: ConfigVersion) -> Result<Verified, VerifyError> {
        let verification_id = Uuid::new_v4();
        let span = tracing::info_span!("wait_for_version", %verification_id, %expected);
        self.poll(expected).instrument(span).await
    }

    /// Like [`wait_for_version`](Self::wait_for_version), but gives up as soon
    /// as `cancel` completes. Returns `None` when cancelled.
    pub async fn wait_for_version_or_cancel<F>(
        &self,
        expected: ConfigVersion,
        cancel: F,
    ) -> Option<Result<Verified, VerifyError>>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.wait_for_version(expected) => Some(result),
            _ = cancel => {
                tracing::info!(%expected, "Config version verification cancelled");
                None
            }
        }
    }

    async fn poll(&self, expected: ConfigVersion) -> Result<Verified, VerifyError> {
        tracing::debug!("Starting poll for updated proxy config");

        let mut verification = Verification::new(expected, &self.policy);
        loop {
            let step = match verification.expire_if_exhausted() {
                Some(step) => step,
                None => {
                    let outcome = self.query(verification.query_budget(self.query_timeout)).await;
                    verification.record(outcome)
                }
            };
            match step {
                Step::Retry(delay) => tokio::time::sleep(delay).await,
                Step::Done(Ok(verified)) => {
                    tracing::info!(
                        attempts = verified.attempts,
                        elapsed_ms = verified.elapsed.as_millis() as u64,
                        "Success, config version ensured"
                    );
                    metrics::record_verification("succeeded", verified.elapsed);
                    return Ok(verified);
                }
                Step::Done(Err(e)) => {
                    tracing::warn!(
                        attempts = verification.attempts,
                        error = %e,
                        "Config version verification timed out"
                    );
                    metrics::record_verification("timed_out", verification.cursor.elapsed());
                    return Err(e);
                }
            }
        }
    }
}

enum Step {
    Retry(Duration),
    Done(Result<Verified, VerifyError>),
}

/// State of one in-flight wait. Owned by that wait alone.
struct Verification {
    expected: ConfigVersion,
    timeout: Duration,
    cursor: BackoffCursor,
    attempts: u32,
    state: VerifyState,
    /// Outcome of the previous attempt while a retry is pending.
    last: Option<AttemptError>,
}

impl Verification {
    fn new(expected: ConfigVersion, policy: &BackoffPolicy) -> Self {
        Self {
            expected,
            timeout: policy.max_elapsed_time,
            cursor: policy.start(),
            attempts: 0,
            state: VerifyState::Polling,
            last: None,
        }
    }

    /// After a sleep that used up the whole budget, time out with the
    /// previous outcome instead of issuing a query with no time left.
    fn expire_if_exhausted(&mut self) -> Option<Step> {
        if !self.cursor.remaining().is_zero() {
            return None;
        }
        let last = self.last.take()?;
        Some(self.time_out(last))
    }

    fn time_out(&mut self, last: AttemptError) -> Step {
        self.state = VerifyState::TimedOut;
        Step::Done(Err(VerifyError::Timeout {
            expected: self.expected,
            timeout: self.timeout,
            last,
        }))
    }

    /// Per-query limit: never longer than what is left of the budget.
    fn query_budget(&self, query_timeout: Duration) -> Duration {
        query_timeout.min(self.cursor.remaining())
    }

    fn record(&mut self, outcome: Result<ConfigVersion, QueryError>) -> Step {
        debug_assert_eq!(self.state, VerifyState::Polling);
        self.attempts += 1;
        self.last = None;

        let last = match outcome {
            Ok(observed) if observed == self.expected => {
                self.state = VerifyState::Succeeded;
                return Step::Done(Ok(Verified {
                    version: observed,
                    attempts: self.attempts,
                    elapsed: self.cursor.elapsed(),
                }));
            }
            Ok(observed) => AttemptError::from(VersionMismatch {
                expected: self.expected,
                observed,
            }),
            Err(e) => AttemptError::from(e),
        };

        match self.cursor.next_backoff() {
            Some(delay) => {
                tracing::debug!(
                    attempt = self.attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %last,
                    "Config version not confirmed yet, backing off"
                );
                self.last = Some(last);
                Step::Retry(delay)
            }
            None => self.time_out(last),
        }
    }
}
