//! Standalone HTTP stub server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request          ┌──────────────────────────────────────────────┐
//!     ────────────────────────┼─▶ net::listener ─▶ http::server (axum)       │
//!                             │                     │   /readyz               │
//!                             │                     │   /_control/handlers ──┐│
//!                             │                     ▼                        ││
//!                             │              routing::dispatcher ◀─ registry ◀┘
//!                             │                     │                         │
//!     Client Response         │                     ▼                         │
//!     ◀───────────────────────┼── middleware chain ─▶ handler                 │
//!                             └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use stub_server::config::{load_config, StubConfig};
use stub_server::observability::logging;
use stub_server::StubServer;

#[derive(Parser)]
#[command(name = "stub-server")]
#[command(about = "Configurable HTTP stub server", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port (0 = ephemeral).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => StubConfig::default(),
    };
    if let Some(host) = cli.host {
        config = config.with_host(host);
    }
    if let Some(port) = cli.port {
        config = config.with_port(port);
    }

    logging::init(&config.logging.filter);
    tracing::info!("stub-server v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        host = %config.listener.host,
        port = config.listener.port,
        preloaded_routes = config.routes.len(),
        control_enabled = config.control.enabled,
        "Configuration loaded"
    );

    let server = StubServer::new(config);
    server.start()?;
    println!("{}", server.url());

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.shutdown().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
