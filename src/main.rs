//! Service Load Balancer (v1)
//!
//! A simple service load balancer built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                 SERVICE LB                     │
//!                         │                                                │
//!   Management request    │  ┌──────────┐    ┌──────────┐    ┌─────────┐  │
//!   ──────────────────────┼─▶│ handlers │───▶│ catalog  │───▶│ service │  │
//!                         │  └──────────┘    └──────────┘    └────┬────┘  │
//!                         │                                       │       │
//!   Forward request       │  ┌──────────┐                         ▼       │
//!   ──────────────────────┼─▶│ forward  │──────────────▶ health table    │
//!                         │  └────┬─────┘                 + round robin   │
//!   Decision (200/404/500)│       │                                       │
//!   ◀─────────────────────┼───────┘                                       │
//!                         │                                                │
//!                         │  config (TOML) · snapshot (JSON) · tracing     │
//!                         │  metrics · lifecycle (startup / shutdown)      │
//!                         └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use service_lb::config::{load_config, AppConfig};
use service_lb::lifecycle::{signals, startup, Shutdown};
use service_lb::observability::logging;

#[derive(Parser)]
#[command(name = "service-lb")]
#[command(about = "Simple service load balancer", long_about = None)]
struct Args {
    /// Server configuration file (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(logging::DEFAULT_FILTER);

    let args = Args::parse();
    tracing::info!("service-lb v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        snapshot_path = %config.services.snapshot_path,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = startup::build_server(config);

    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());
    startup::spawn_metrics_refresh(&server, &shutdown);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
