//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{FileConfig, ServerConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Errors from reading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Read a TOML file into a `FileConfig` without validating it.
///
/// Callers apply command-line overrides before calling [`finalize`].
pub fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Validate a `FileConfig` into the runtime config.
pub fn finalize(config: &FileConfig) -> Result<ServerConfig, ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    finalize(&read_config(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
root = "{}"
port = 8080

[upstream]
target = "https://example.test"
connect_timeout_secs = 3
proxy_prefixes = ["/_nuxt", "/api"]

[observability]
metrics_address = "127.0.0.1:9090"
"#,
            dir.path().display()
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.upstream.as_str(), "https://example.test/");
        assert_eq!(config.proxy_prefixes.len(), 2);
        assert_eq!(config.connect_timeout.unwrap().as_secs(), 3);
        assert!(config.metrics_address.is_some());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file_config: FileConfig = toml::from_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(file_config.server.port, 9000);
        assert_eq!(file_config.upstream.target, "https://www.maringa.pr.gov.br");
        assert_eq!(file_config.upstream.proxy_prefixes, vec!["/_nuxt".to_string()]);
        assert_eq!(file_config.observability.log_level, "info");
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[server\nport = ").unwrap();
        assert!(matches!(read_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = read_config(Path::new("/no/such/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validation_error_lists_every_problem() {
        let dir = tempfile::tempdir().unwrap();
        let mut file_config = FileConfig::default();
        file_config.server.root = dir.path().to_path_buf();
        file_config.server.port = 0;
        file_config.upstream.target = "ftp://example.test".to_string();

        let err = finalize(&file_config).unwrap_err();
        let ConfigError::Validation(errors) = &err else {
            panic!("expected validation error, got {:?}", err);
        };
        assert_eq!(errors.len(), 2);

        let message = err.to_string();
        assert!(message.starts_with("invalid configuration: "));
        assert_eq!(message.matches("; ").count(), 1);
    }
}
