//! Configuration schema definitions.
//!
//! `FileConfig` is the on-disk shape (every field optional or defaulted).
//! `ServerConfig` is the validated, immutable form the server runs with.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Path prefix forwarded upstream when no other prefixes are configured.
pub const RESERVED_PREFIX: &str = "/_nuxt";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5500;

/// Default upstream origin.
pub const DEFAULT_TARGET: &str = "https://www.maringa.pr.gov.br";

/// Default site root, relative to the working directory.
pub const DEFAULT_ROOT: &str = "www.maringa.pr.gov.br";

/// Root of the TOML configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FileConfig {
    /// Local serving settings.
    pub server: ServerSection,

    /// Upstream forwarding settings.
    pub upstream: UpstreamSection,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Local serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSection {
    /// Directory holding the mirrored site.
    pub root: PathBuf,

    /// Listening port.
    pub port: u16,

    /// Interface to bind.
    pub bind_ip: IpAddr,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            port: DEFAULT_PORT,
            bind_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
        }
    }
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamSection {
    /// Base URL of the upstream origin (scheme + host, optional port).
    pub target: String,

    /// Connect timeout in seconds. Unset means the transport default.
    pub connect_timeout_secs: Option<u64>,

    /// Request paths starting with any of these are forwarded upstream.
    pub proxy_prefixes: Vec<String>,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            connect_timeout_secs: None,
            proxy_prefixes: vec![RESERVED_PREFIX.to_string()],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Prometheus endpoint bind address. Metrics are not exported when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}

/// Validated runtime configuration.
///
/// Built once at startup and shared read-only for the life of the process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Canonical, absolute site root.
    pub root: PathBuf,

    /// Listening port.
    pub port: u16,

    /// Interface to bind.
    pub bind_ip: IpAddr,

    /// Upstream origin.
    pub upstream: Url,

    /// Forwarded path prefixes.
    pub proxy_prefixes: Vec<String>,

    /// Optional upstream connect timeout.
    pub connect_timeout: Option<Duration>,

    /// Optional Prometheus endpoint.
    pub metrics_address: Option<SocketAddr>,
}

impl ServerConfig {
    /// Build a config with default prefixes and no timeouts.
    ///
    /// `root` is used as given; callers are expected to pass a canonical path.
    pub fn new(root: impl Into<PathBuf>, port: u16, upstream: Url) -> Self {
        Self {
            root: root.into(),
            port,
            bind_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            upstream,
            proxy_prefixes: vec![RESERVED_PREFIX.to_string()],
            connect_timeout: None,
            metrics_address: None,
        }
    }

    /// Address the listener binds to.
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }
}
