//! Static file responder.
//!
//! # Responsibilities
//! - Stat the resolved path; anything but a regular file is a 404
//! - Pick a content type from the extension table
//! - Stream the file body without reading it into memory
//!
//! # Design Decisions
//! - Headers (type, length) are fixed before the first body byte
//! - A read error after headers went out aborts the body; the client sees
//!   a truncated response, which is accepted degraded behavior
//! - Symlinks are followed only while they stay under the root
//! - Never produces a directory listing

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::TryStreamExt;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::http::error::ServeError;
use crate::http::mime::content_type_for;
use crate::routing::ResolveError;

/// Serves files from a single canonical root.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Build the response for an already-resolved path under the root.
    pub async fn serve(&self, path: &Path) -> Result<Response, ServeError> {
        let located = self.locate(path).await?;
        self.stream(&located, content_type_for(path)).await
    }

    /// Stat `path` and confirm it is a regular file that stays under the root.
    async fn locate(&self, path: &Path) -> Result<Located, ServeError> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) if m.is_file() => m,
            _ => return Err(ServeError::NotFound),
        };

        let canonical = tokio::fs::canonicalize(path).await?;
        if !canonical.starts_with(&self.root) {
            tracing::warn!(
                path = %path.display(),
                resolved = %canonical.display(),
                "Symlink points outside the site root"
            );
            return Err(ServeError::Forbidden(ResolveError::Traversal));
        }

        Ok(Located {
            canonical,
            len: metadata.len(),
        })
    }

    /// Open a located file and stream it with fixed headers.
    ///
    /// The file can vanish between the stat and the open; that surfaces as
    /// `ServerFault`.
    async fn stream(
        &self,
        located: &Located,
        content_type: &'static str,
    ) -> Result<Response, ServeError> {
        let file = File::open(&located.canonical).await?;

        let display_path = located.canonical.display().to_string();
        let stream = ReaderStream::new(file).inspect_err(move |e| {
            tracing::error!(path = %display_path, error = %e, "Read failed mid-stream, aborting body");
        });

        Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
                (header::CONTENT_LENGTH, HeaderValue::from(located.len)),
            ],
            Body::from_stream(stream),
        )
            .into_response())
    }
}

/// A regular file under the root, as seen at stat time.
#[derive(Debug)]
struct Located {
    canonical: PathBuf,
    len: u64,
}
