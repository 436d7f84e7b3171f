//! Request-level error taxonomy.
//!
//! Every variant is terminal for the current request and turns into a
//! status code plus a short plain-text body. Nothing here escapes the
//! handler that produced it.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::routing::ResolveError;

#[derive(Debug, Error)]
pub enum ServeError {
    /// Local file is absent or not a regular file.
    #[error("not found")]
    NotFound,

    /// Resolved path falls outside the site root.
    #[error("forbidden: {0}")]
    Forbidden(#[from] ResolveError),

    /// Local read failed after the path resolved.
    #[error("server error: {0}")]
    ServerFault(#[from] std::io::Error),

    /// Upstream connection or request failed before a response arrived.
    #[error("bad gateway: {0}")]
    UpstreamUnavailable(String),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::NotFound => StatusCode::NOT_FOUND,
            ServeError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServeError::ServerFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServeError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Body sent to the client. Only the 502 carries the underlying reason.
    fn body(&self) -> String {
        match self {
            ServeError::NotFound => "Not found".to_string(),
            ServeError::Forbidden(_) => "Forbidden".to_string(),
            ServeError::ServerFault(_) => "Server error".to_string(),
            ServeError::UpstreamUnavailable(reason) => format!("Bad gateway: {}", reason),
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.body(),
        )
            .into_response()
    }
}
