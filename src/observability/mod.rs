//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher and responders produce:
//!     → logging.rs (structured log events, one span per request)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request IDs live in the tracing span only; they are never added to
//!   forwarded headers
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
