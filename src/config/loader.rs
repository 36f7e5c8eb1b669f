//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::VerifierConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<VerifierConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: VerifierConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_partial_config() {
        let file = write_config(
            r#"
            [endpoint]
            socket_path = "/run/nginx/version.sock"

            [timeouts]
            reload_ms = 4000

            [backoff]
            max_interval_ms = 250
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.endpoint.socket_path, "/run/nginx/version.sock");
        assert_eq!(config.endpoint.query_timeout_ms, 1_000);
        assert_eq!(config.timeouts.reload_ms, 4000);
        assert_eq!(config.backoff.initial_interval_ms, 25);
        assert_eq!(config.backoff.max_interval_ms, 250);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let file = write_config("[backoff\n");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_reports_all_validation_errors() {
        let file = write_config(
            r#"
            [backoff]
            initial_interval_ms = 0
            multiplier = 0.5
            "#,
        );

        match load_config(file.path()) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
