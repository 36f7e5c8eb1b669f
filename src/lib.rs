//! Reload verification for a signal-reloaded reverse proxy.
//!
//! The control plane embeds a [`ConfigVersion`] into every rendered proxy
//! configuration through [`VersionTemplate`], asks the proxy to reload, then
//! calls [`ReloadVerifier::wait_for_version`] to learn when the new workers
//! actually serve it.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod template;
pub mod verify;
pub mod version;

pub use config::VerifierConfig;
pub use http::VersionResponder;
pub use resilience::BackoffPolicy;
pub use template::{TemplateError, VersionTemplate};
pub use verify::{QueryError, ReloadVerifier, Verified, VerifyError, VersionClient, VersionSource};
pub use version::ConfigVersion;
