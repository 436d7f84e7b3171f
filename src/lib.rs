//! Static mirror server with upstream passthrough.
//!
//! Serves a mirrored website from a local directory and forwards requests
//! under a reserved prefix (`/_nuxt` by default) to the original origin,
//! streaming bodies in both directions.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
