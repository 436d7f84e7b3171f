//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request span, dispatch)
//!     → [routing::resolver classifies the path]
//!     → static_files.rs (LocalFile) | proxy.rs (Proxy) | 403 (Forbidden)
//!     → error.rs (failures become status + plain-text body)
//!     → Stream response to client
//! ```

pub mod error;
pub mod mime;
pub mod proxy;
pub mod server;
pub mod static_files;

pub use error::ServeError;
pub use proxy::{ForwarderError, UpstreamForwarder};
pub use server::{AppState, HttpServer};
pub use static_files::StaticFiles;
