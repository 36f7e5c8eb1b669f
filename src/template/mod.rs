//! Version endpoint template subsystem.
//!
//! # Data Flow
//! ```text
//! VERSION_ENDPOINT_TEMPLATE (compile-time constant)
//!     → parser.rs (parsed once at start-up, malformed source is fatal)
//!     → version_endpoint.rs (render version + flags into nginx config bytes)
//!     → written into the proxy config tree by the caller
//!     → proxy reload exposes GET /configVersion on the private socket
//! ```
//!
//! # Design Decisions
//! - Parsing and rendering are split so rendering can never fail
//! - Rendering is a pure function of its arguments

pub mod parser;
pub mod version_endpoint;

pub use parser::TemplateError;
pub use version_endpoint::{
    version_mismatch, VersionTemplate, EXPECTED_VERSION_HEADER, MISMATCH_MARKER,
    VERSION_ENDPOINT_TEMPLATE,
};
