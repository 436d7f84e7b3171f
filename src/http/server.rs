//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum Router with a single catch-all dispatcher
//! - Wire up middleware (request span with request ID)
//! - Classify each request and hand it to exactly one responder
//! - Convert responder errors into status codes
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::http::error::ServeError;
use crate::http::proxy::{ForwarderError, UpstreamForwarder};
use crate::http::static_files::StaticFiles;
use crate::lifecycle::shutdown::signalled;
use crate::observability::metrics;
use crate::routing::{PathResolver, ResolvedTarget};

/// Application state injected into the dispatcher.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<PathResolver>,
    pub files: StaticFiles,
    pub forwarder: UpstreamForwarder,
}

/// HTTP server for the mirrored site.
pub struct HttpServer {
    router: Router,
    config: Arc<ServerConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self, ForwarderError> {
        let forwarder = UpstreamForwarder::new(&config.upstream, config.connect_timeout)?;
        let state = AppState {
            resolver: Arc::new(PathResolver::from_config(&config)),
            files: StaticFiles::new(config.root.clone()),
            forwarder,
        };

        Ok(Self {
            router: Self::build_router(state),
            config: Arc::new(config),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                request_id = %Uuid::new_v4(),
                method = %request.method(),
                uri = %request.uri(),
            )
        });

        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(ServiceBuilder::new().layer(trace))
    }

    /// Router without a listener, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");
        tracing::info!(root = %self.config.root.display(), "Serving root");
        for prefix in &self.config.proxy_prefixes {
            tracing::info!(
                "Proxying {} -> {}{}",
                prefix,
                self.config.upstream.as_str().trim_end_matches('/'),
                prefix
            );
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signalled(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Catch-all handler. Classification looks at the path only; the method
/// is never consulted.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let target = state.resolver.resolve(&path);
    tracing::debug!(path = %path, resolved = ?target, "Resolved request");

    let (branch, result) = match target {
        Ok(ResolvedTarget::Proxy) => ("proxy", state.forwarder.forward(request).await),
        Ok(ResolvedTarget::LocalFile(file)) => ("static", state.files.serve(&file).await),
        Err(e) => ("forbidden", Err(ServeError::Forbidden(e))),
    };

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            match &e {
                ServeError::NotFound => tracing::debug!(path = %path, "Not found"),
                ServeError::Forbidden(reason) => {
                    tracing::warn!(path = %path, reason = %reason, "Forbidden path")
                }
                ServeError::ServerFault(io) => {
                    tracing::error!(path = %path, error = %io, "Failed to read file")
                }
                ServeError::UpstreamUnavailable(reason) => {
                    tracing::warn!(path = %path, reason = %reason, "Upstream error")
                }
            }
            e.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), branch, start_time);
    response
}
