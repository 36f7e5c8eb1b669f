//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → VerifierConfig (validated, immutable)
//!     → ReloadVerifier / VersionTemplate constructors
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty file is a valid config
//! - Backoff bounds are plain values handed to each verifier, never globals
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BackoffConfig, EndpointConfig, ObservabilityConfig, TemplateConfig, TimeoutConfig,
    VerifierConfig, DEFAULT_SOCKET_PATH,
};
pub use validation::{validate_config, ValidationError};
