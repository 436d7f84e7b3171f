//! Request path classification.
//!
//! # Responsibilities
//! - Classify a path as proxy-bound or local
//! - Map local paths into the site root (default document, percent-decoding)
//! - Refuse anything that would land outside the root
//!
//! # Design Decisions
//! - Pure function of the path: no filesystem access, no existence check
//! - Canonicalization is lexical and runs after decoding, so encoded
//!   `..` and separators are handled like literal ones
//! - Escaping the root is an error, never a clamped path

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::ServerConfig;
use crate::routing::matcher::ProxyRules;

/// Name of the default document appended to directory paths.
pub const INDEX_FILE: &str = "index.html";

/// Result of classifying a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// Forward the request to the upstream origin.
    Proxy,
    /// Serve this file. Always inside the configured root.
    LocalFile(PathBuf),
}

/// Reasons a path is refused. All of them surface as 403 Forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("path escapes the site root")]
    Traversal,
    #[error("path contains a NUL byte")]
    NulByte,
    #[error("path is not valid percent-encoded UTF-8")]
    InvalidEncoding,
}

/// Maps request paths to targets for one site root.
#[derive(Debug)]
pub struct PathResolver {
    root: PathBuf,
    rules: ProxyRules,
}

impl PathResolver {
    /// Create a resolver. `root` should already be canonical.
    pub fn new(root: impl Into<PathBuf>, rules: ProxyRules) -> Self {
        Self {
            root: root.into(),
            rules,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.root.clone(),
            ProxyRules::from_prefixes(&config.proxy_prefixes),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Classify `request_path` (the URI path, query already removed).
    pub fn resolve(&self, request_path: &str) -> Result<ResolvedTarget, ResolveError> {
        if self.rules.matches(request_path) {
            return Ok(ResolvedTarget::Proxy);
        }

        let decoded = percent_decode_str(request_path)
            .decode_utf8()
            .map_err(|_| ResolveError::InvalidEncoding)?;
        if decoded.contains('\0') {
            return Err(ResolveError::NulByte);
        }

        let mut candidate = self.root.clone();
        let mut depth = 0usize;
        for segment in decoded.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    if depth == 0 {
                        return Err(ResolveError::Traversal);
                    }
                    candidate.pop();
                    depth -= 1;
                }
                name => {
                    candidate.push(name);
                    depth += 1;
                }
            }
        }

        if request_path.is_empty() || request_path.ends_with('/') {
            candidate.push(INDEX_FILE);
        }

        if !candidate.starts_with(&self.root) {
            return Err(ResolveError::Traversal);
        }
        Ok(ResolvedTarget::LocalFile(candidate))
    }
}
