//! Configuration validation.
//!
//! Turns a `FileConfig` into a `ServerConfig`, collecting every problem
//! instead of stopping at the first one.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::schema::{FileConfig, ServerConfig};

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Port 0 is not a usable listening port.
    #[error("port must be between 1 and 65535")]
    ZeroPort,
    /// Root directory is missing or not a directory.
    #[error("root {}: {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },
    /// Upstream target is not an absolute http(s) URL with a host.
    #[error("target {target}: {reason}")]
    InvalidTarget { target: String, reason: String },
    /// Proxy prefix does not start with '/'.
    #[error("proxy prefix {0:?} must start with '/'")]
    InvalidPrefix(String),
    /// Metrics address does not parse as a socket address.
    #[error("metrics address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a file config and produce the runtime config.
pub fn validate_config(config: &FileConfig) -> Result<ServerConfig, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    let root = match canonical_root(&config.server.root) {
        Ok(root) => Some(root),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let upstream = match parse_target(&config.upstream.target) {
        Ok(url) => Some(url),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    for prefix in &config.upstream.proxy_prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPrefix(prefix.clone()));
        }
    }

    let metrics_address = match &config.observability.metrics_address {
        Some(addr) => match addr.parse::<SocketAddr>() {
            Ok(a) => Some(a),
            Err(_) => {
                errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
                None
            }
        },
        None => None,
    };

    match (root, upstream) {
        (Some(root), Some(upstream)) if errors.is_empty() => Ok(ServerConfig {
            root,
            port: config.server.port,
            bind_ip: config.server.bind_ip,
            upstream,
            proxy_prefixes: config.upstream.proxy_prefixes.clone(),
            connect_timeout: config.upstream.connect_timeout_secs.map(Duration::from_secs),
            metrics_address,
        }),
        _ => Err(errors),
    }
}

fn canonical_root(path: &Path) -> Result<PathBuf, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidRoot {
        path: path.to_path_buf(),
        reason,
    };

    let canonical = std::fs::canonicalize(path).map_err(|e| invalid(e.to_string()))?;
    if !canonical.is_dir() {
        return Err(invalid("not a directory".to_string()));
    }
    Ok(canonical)
}

/// Parse an upstream base URL, accepting only absolute http(s) URLs with a host.
pub fn parse_target(target: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidTarget {
        target: target.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(target).map_err(|e| invalid(&e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(invalid("scheme must be http or https")),
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_with_existing_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = FileConfig::default();
        config.server.root = dir.path().to_path_buf();

        let server = validate_config(&config).unwrap();
        assert_eq!(server.port, 5500);
        assert_eq!(server.upstream.host_str(), Some("www.maringa.pr.gov.br"));
        assert_eq!(server.proxy_prefixes, vec!["/_nuxt".to_string()]);
        assert!(server.root.is_absolute());
        assert_eq!(server.bind_address().to_string(), "127.0.0.1:5500");
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = FileConfig::default();
        config.server.root = PathBuf::from("/definitely/not/here");
        config.server.port = 0;
        config.upstream.target = "ftp://example.test".to_string();
        config.upstream.proxy_prefixes = vec!["_nuxt".to_string()];
        config.observability.metrics_address = Some("nope".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::ZeroPort));
        assert!(errors.contains(&ValidationError::InvalidPrefix("_nuxt".to_string())));
    }

    #[test]
    fn test_root_must_be_directory() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut config = FileConfig::default();
        config.server.root = file.path().to_path_buf();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidRoot { .. }));
    }

    #[test]
    fn test_parse_target() {
        assert!(parse_target("https://example.test").is_ok());
        assert!(parse_target("http://127.0.0.1:8080").is_ok());
        assert!(parse_target("example.test").is_err());
        assert!(parse_target("file:///etc").is_err());
    }
}
