//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Open the log store (creating its directory)
//! - Bind the listener and serve until shutdown
//!
//! Subsystems initialize in order; any startup error is fatal.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Start the service and serve until `shutdown` is triggered.
pub async fn run(config: ServiceConfig, shutdown: &Shutdown) -> Result<()> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| Error::Address(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        logs_dir = %server.store().dir().display(),
        "Location capture service listening"
    );

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
