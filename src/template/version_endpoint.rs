//! The internal-only nginx server block exposing the running config version.

use crate::template::parser::{self, Flag, Segment, TemplateError, Variable};
use crate::version::ConfigVersion;

/// Template for the version endpoint. Parsed once by [`VersionTemplate::new`].
pub const VERSION_ENDPOINT_TEMPLATE: &str = r#"server {
    listen unix:{{socket_path}};
    access_log off;
{{#if extra_module}}    opentracing off;
{{/if}}
    location /configVersion {
        return 200 {{config_version}};
    }
}
map $http_x_expected_config_version $config_version_mismatch {
    "{{config_version}}" "";
    default "mismatch";
}
"#;

/// Request header compared against the embedded version by the mismatch map.
pub const EXPECTED_VERSION_HEADER: &str = "x-expected-config-version";

/// Value of `$config_version_mismatch` when the header does not match.
pub const MISMATCH_MARKER: &str = "mismatch";

/// Parsed version endpoint template bound to the endpoint's socket path.
#[derive(Debug, Clone)]
pub struct VersionTemplate {
    segments: Vec<Segment>,
    socket_path: String,
}

impl VersionTemplate {
    /// Parse the built-in template. Errors here must abort start-up.
    pub fn new(socket_path: impl Into<String>) -> Result<Self, TemplateError> {
        Self::parse(VERSION_ENDPOINT_TEMPLATE, socket_path)
    }

    /// Parse a custom template source.
    pub fn parse(source: &str, socket_path: impl Into<String>) -> Result<Self, TemplateError> {
        Ok(Self {
            segments: parser::parse(source)?,
            socket_path: socket_path.into(),
        })
    }

    pub fn socket_path(&self) -> &str {
        &self.socket_path
    }

    /// Render the config block for `version`.
    ///
    /// `extra_module_enabled` includes the `opentracing off;` directive, which
    /// is only valid when the tracing module is loaded into nginx.
    pub fn render(&self, version: ConfigVersion, extra_module_enabled: bool) -> Vec<u8> {
        let mut out = String::new();
        self.render_segments(&self.segments, version, extra_module_enabled, &mut out);
        out.into_bytes()
    }

    fn render_segments(
        &self,
        segments: &[Segment],
        version: ConfigVersion,
        extra_module_enabled: bool,
        out: &mut String,
    ) {
        for segment in segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Var(Variable::ConfigVersion) => out.push_str(&version.to_string()),
                Segment::Var(Variable::SocketPath) => out.push_str(&self.socket_path),
                Segment::If { flag: Flag::ExtraModule, body } => {
                    if extra_module_enabled {
                        self.render_segments(body, version, extra_module_enabled, out);
                    }
                }
            }
        }
    }
}

/// Evaluate the `$config_version_mismatch` map for a request.
///
/// Returns `""` when the expected-version header equals the current version
/// exactly and [`MISMATCH_MARKER`] otherwise, including when it is absent.
pub fn version_mismatch(expected_header: Option<&str>, current: ConfigVersion) -> &'static str {
    match expected_header {
        Some(value) if value == current.to_string() => "",
        _ => MISMATCH_MARKER,
    }
}
