//! Stand-in version endpoint.
//!
//! Serves the same `GET /configVersion` contract as the rendered nginx block,
//! so the verifier can be exercised without a proxy.

pub mod server;

pub use server::{VersionResponder, MISMATCH_RESPONSE_HEADER};
