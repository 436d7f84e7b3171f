//! mirror-proxy
//!
//! Serves a mirrored static site and forwards `/_nuxt` requests to the
//! original origin.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                 MIRROR PROXY                  │
//!     Client Request      │  ┌─────────┐    ┌────────────┐               │
//!     ────────────────────┼─▶│  http   │───▶│  routing   │               │
//!                         │  │ server  │    │  resolver  │               │
//!                         │  └─────────┘    └─────┬──────┘               │
//!                         │          ┌────────────┼─────────────┐        │
//!                         │          ▼            ▼             ▼        │
//!                         │   ┌────────────┐ ┌─────────┐ ┌───────────┐   │
//!     Client Response     │   │static_files│ │   403   │ │   proxy   │───┼──▶ Upstream
//!     ◀───────────────────┼───│  (root)    │ │         │ │ forwarder │◀──┼─── (HTTPS)
//!                         │   └────────────┘ └─────────┘ └───────────┘   │
//!                         │                                               │
//!                         │   config · observability · lifecycle         │
//!                         └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use mirror_proxy::config::{loader, FileConfig};
use mirror_proxy::lifecycle::{signals, Shutdown};
use mirror_proxy::observability::{logging, metrics};
use mirror_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "mirror-proxy")]
#[command(about = "Serve a mirrored site locally and proxy /_nuxt to the origin", long_about = None)]
struct Cli {
    /// Directory holding the mirrored site
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Upstream origin for proxied paths
    #[arg(long)]
    target: Option<String>,

    /// Interface to bind
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Optional TOML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut FileConfig) {
        if let Some(root) = self.root {
            config.server.root = root;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(target) = self.target {
            config.upstream.target = target;
        }
        if let Some(bind) = self.bind {
            config.server.bind_ip = bind;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut file_config = match &cli.config {
        Some(path) => loader::read_config(path)?,
        None => FileConfig::default(),
    };
    cli.apply(&mut file_config);

    logging::init_logging(&file_config.observability.log_level);
    tracing::info!("mirror-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match loader::finalize(&file_config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    if let Some(addr) = config.metrics_address {
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        "Proxy server running at http://{}/",
        listener.local_addr()?
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal(&signal_shutdown).await;
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
