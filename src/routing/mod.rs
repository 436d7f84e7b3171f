//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path (query removed)
//!     → matcher.rs (proxy predicates on the raw path)
//!     → resolver.rs (decode, canonicalize, containment check)
//!     → Return: Proxy | LocalFile(path) | Forbidden
//!
//! Rule compilation (at startup):
//!     ServerConfig.proxy_prefixes
//!     → PathPrefixMatcher per prefix
//!     → Freeze as immutable ProxyRules
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: the same path always resolves the same way

pub mod matcher;
pub mod resolver;

pub use matcher::{Matcher, PathPrefixMatcher, ProxyRules};
pub use resolver::{PathResolver, ResolveError, ResolvedTarget};
