//! Error taxonomy for version queries and verifications.

use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

use hyper::StatusCode;
use thiserror::Error;

use crate::version::ConfigVersion;

/// A single version query failed. Always retryable inside a wait.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to connect to config version socket {}: {source}", .path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config version request failed: {0}")]
    Http(#[from] hyper::Error),

    #[error("invalid config version request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("non-200 response: {0}")]
    Status(StatusCode),

    #[error("error converting {body:?} to a config version: {source}")]
    MalformedBody {
        body: String,
        #[source]
        source: ParseIntError,
    },

    #[error("config version query timed out after {0:?}")]
    Timeout(Duration),
}

/// The proxy answered, but with another configuration's version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected version: {expected}, got: {observed}")]
pub struct VersionMismatch {
    pub expected: ConfigVersion,
    pub observed: ConfigVersion,
}

/// Outcome of the most recent unsuccessful attempt.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Mismatch(#[from] VersionMismatch),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Terminal failure of a verification.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("proxy did not confirm configuration version {expected} within {timeout:?}: {last}")]
    Timeout {
        expected: ConfigVersion,
        timeout: Duration,
        #[source]
        last: AttemptError,
    },
}

impl VerifyError {
    pub fn expected(&self) -> ConfigVersion {
        match self {
            VerifyError::Timeout { expected, .. } => *expected,
        }
    }

    /// The last state observed before giving up.
    pub fn last_attempt(&self) -> &AttemptError {
        match self {
            VerifyError::Timeout { last, .. } => last,
        }
    }
}
