//! Upstream proxy forwarder.
//!
//! # Responsibilities
//! - Rebuild the inbound request against the upstream origin
//! - Stream the request body up and the response body back
//! - Map connection failures to 502 with the failure reason
//!
//! # Data Flow
//! ```text
//! Client ── method, headers (Host rewritten), body stream ──→ Upstream
//! Client ←── status, headers, body stream (untouched) ─────── Upstream
//! ```
//!
//! # Design Decisions
//! - Single attempt per request, no retries
//! - Path and query go out byte-for-byte, no dot-segment or query normalization
//! - Headers pass through unfiltered, hop-by-hop ones included
//! - Redirects are returned to the client, never followed
//! - No rewriting of Location or Set-Cookie

use axum::body::{Body, HttpBody};
use axum::http::header::{self, HeaderValue, InvalidHeaderValue};
use axum::http::uri::{Authority, InvalidUri, PathAndQuery, Scheme, Uri};
use axum::http::Request;
use axum::response::Response;
use hyper::body::Incoming;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use std::error::Error as StdError;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::http::error::ServeError;

/// Errors building the forwarder at startup.
#[derive(Debug, Error)]
pub enum ForwarderError {
    #[error("failed to configure TLS: {0}")]
    Tls(#[from] rustls::Error),
    #[error("upstream authority is not a valid Host header: {0}")]
    Authority(#[from] InvalidHeaderValue),
    #[error("upstream URL is not a valid request target: {0}")]
    Uri(#[from] InvalidUri),
    #[error("upstream URL has no host")]
    MissingHost,
}

/// Forwards proxy-classified requests to one upstream origin.
#[derive(Debug, Clone)]
pub struct UpstreamForwarder {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    scheme: Scheme,
    authority: Authority,
    /// Path of the base URL without a trailing slash, empty for the origin root.
    base_path: String,
    /// Value written into the outbound Host header.
    host: HeaderValue,
}

impl UpstreamForwarder {
    /// Create a forwarder for `upstream`.
    ///
    /// TLS is used for `https` bases, verified against the bundled Mozilla roots.
    pub fn new(upstream: &Url, connect_timeout: Option<Duration>) -> Result<Self, ForwarderError> {
        let host = upstream.host_str().ok_or(ForwarderError::MissingHost)?;
        let authority = match upstream.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_connect_timeout(connect_timeout);

        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())?
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);

        let client = Client::builder(TokioExecutor::new()).build(https);

        Ok(Self {
            client,
            scheme: Scheme::from_str(upstream.scheme())?,
            authority: Authority::from_str(&authority)?,
            base_path: upstream.path().trim_end_matches('/').to_string(),
            host: HeaderValue::from_str(&authority)?,
        })
    }

    /// Host header value sent upstream.
    pub fn authority(&self) -> &HeaderValue {
        &self.host
    }

    /// Upstream URI for an inbound path and query, appended verbatim.
    pub fn upstream_uri(&self, path_and_query: &PathAndQuery) -> Result<Uri, axum::http::Error> {
        let path_and_query = if self.base_path.is_empty() {
            path_and_query.clone()
        } else {
            PathAndQuery::try_from(format!("{}{}", self.base_path, path_and_query.as_str()))?
        };

        Ok(Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()?)
    }

    /// Forward `request` and stream the upstream response back.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response, ServeError> {
        let (mut parts, body) = request.into_parts();
        let path_and_query = parts
            .uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        parts.uri = self
            .upstream_uri(&path_and_query)
            .map_err(|e| ServeError::UpstreamUnavailable(format!("invalid upstream URI: {}", e)))?;
        parts.headers.insert(header::HOST, self.host.clone());

        tracing::debug!(method = %parts.method, uri = %parts.uri, "Forwarding upstream");

        let body = if body.size_hint().exact() == Some(0) {
            Body::empty()
        } else {
            body
        };

        let upstream: Response<Incoming> = self
            .client
            .request(Request::from_parts(parts, body))
            .await
            .map_err(|e| ServeError::UpstreamUnavailable(error_chain(&e)))?;

        Ok(upstream.map(Body::new))
    }
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
