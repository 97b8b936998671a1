//! Standalone health endpoint.
//!
//! Reads dependencies from a TOML file and serves their aggregate health over
//! gRPC and HTTP until SIGINT/SIGTERM.
//!
//! ```text
//! healthz --config healthz.toml
//! ```

use std::path::PathBuf;

use clap::Parser;

use healthz::config::{load_config, HealthzConfig};
use healthz::lifecycle::shutdown_signal;
use healthz::observability::{logging, metrics};
use healthz::HealthzBuilder;

#[derive(Parser)]
#[command(name = "healthz")]
#[command(about = "Aggregated dependency health over gRPC and HTTP", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => HealthzConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!("healthz v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        config = ?args.config,
        grpc_port = config.server.grpc_port,
        http_port = config.server.http_port,
        checkers = config.checkers.len(),
        probe_timeout_secs = config.probe.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let healthz = HealthzBuilder::from_config(&config)?.start().await?;

    shutdown_signal().await;
    healthz.shutdown().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
