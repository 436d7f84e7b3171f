//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line (clap) + optional TOML file
//!     → loader.rs (parse & deserialize into FileConfig)
//!     → CLI overrides applied by main
//!     → validation.rs (semantic checks, root canonicalization)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc with every request handler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All file fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{FileConfig, ObservabilityConfig, ServerConfig, RESERVED_PREFIX};
