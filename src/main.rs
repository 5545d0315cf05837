//! Location capture server.
//!
//! Run with defaults (port 3000, logs under `./location_logs`):
//! ```not_rust
//! cargo run
//! ```
//!
//! Or with a config file and overrides:
//! ```not_rust
//! PORT=8080 cargo run -- --config location-capture.toml --logs-dir /var/lib/locations
//! ```

use std::path::PathBuf;

use clap::Parser;

use location_capture::config::{loader::set_port, resolve_config};
use location_capture::error::Result;
use location_capture::lifecycle::{startup, Shutdown};
use location_capture::observability::init_logging;

#[derive(Parser)]
#[command(name = "location-capture", version)]
#[command(about = "Capture geolocation submissions into per-day JSON logs", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides config and PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory for the per-day log files (overrides config and LOGS_DIR).
    #[arg(long)]
    logs_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref(), |config| {
        if let Some(port) = cli.port {
            set_port(config, port);
        }
        if let Some(dir) = cli.logs_dir.clone() {
            config.storage.logs_dir = dir;
        }
        if let Some(level) = cli.log_level.clone() {
            config.observability.log_level = level;
        }
    })?;

    init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        logs_dir = %config.storage.logs_dir,
        request_timeout_secs = config.http.request_timeout_secs,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
