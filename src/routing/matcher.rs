//! Proxy predicate matching.
//!
//! # Responsibilities
//! - Decide from the raw request path alone whether a request is forwarded
//! - Combine predicates with OR semantics (any match forwards)
//!
//! # Design Decisions
//! - Path matching is case-sensitive and runs on the undecoded path
//! - Method and headers are never consulted
//! - No regex, prefix checks only

use crate::config::RESERVED_PREFIX;

/// Trait for matching request paths against a forwarding condition.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// The set of predicates that route a request upstream.
#[derive(Debug)]
pub struct ProxyRules {
    matchers: Vec<Box<dyn Matcher>>,
}

impl ProxyRules {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    /// Build prefix matchers for each configured prefix.
    pub fn from_prefixes<S: AsRef<str>>(prefixes: &[S]) -> Self {
        Self::new(
            prefixes
                .iter()
                .map(|p| Box::new(PathPrefixMatcher::new(p.as_ref())) as Box<dyn Matcher>)
                .collect(),
        )
    }

    /// Returns true if any predicate matches.
    pub fn matches(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }
}

impl Default for ProxyRules {
    fn default() -> Self {
        Self::from_prefixes(&[RESERVED_PREFIX])
    }
}
