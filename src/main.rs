//! Upstream Status Exporter
//!
//! Exposes the counters of an nginx upstream status page as Prometheus
//! metrics.
//!
//! # Architecture Overview
//!
//! ```text
//!   Prometheus              ┌──────────────────────────────────────────┐
//!   ───── GET /metrics ────▶│  http server ──▶ StatusCollector::collect │
//!                           │                    │                     │
//!                           │                    ▼                     │      nginx
//!                           │              fetch status page ──────────┼───▶ status page
//!                           │                    │                     │
//!                           │                    ▼                     │
//!   ◀──── text format ──────│  encoder ◀── gauges / counters ◀── parse │
//!                           └──────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use upstream_status_exporter::config::{read_config, validate_config, ConfigError, ExporterConfig};
use upstream_status_exporter::lifecycle::signals::wait_for_signal;
use upstream_status_exporter::observability::logging::init_logging;
use upstream_status_exporter::{HttpServer, Shutdown, StatusCollector};

#[derive(Parser, Debug)]
#[command(name = "upstream-status-exporter")]
#[command(about = "Prometheus exporter for the nginx upstream status page", version)]
struct Cli {
    /// TOML configuration file. Flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address on which to expose metrics.
    #[arg(long = "telemetry.address")]
    telemetry_address: Option<String>,

    /// Path under which to expose metrics.
    #[arg(long = "telemetry.endpoint")]
    telemetry_endpoint: Option<String>,

    /// URI of the nginx upstream status page.
    #[arg(long = "nginx.scrape_uri")]
    scrape_uri: Option<String>,

    /// Ignore the server certificate when scraping over https.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    insecure: Option<bool>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long = "log.level")]
    log_level: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut ExporterConfig) {
        if let Some(address) = self.telemetry_address {
            config.telemetry.listen_address = address;
        }
        if let Some(path) = self.telemetry_endpoint {
            config.telemetry.metrics_path = path;
        }
        if let Some(uri) = self.scrape_uri {
            config.upstream.scrape_uri = uri;
        }
        if let Some(insecure) = self.insecure {
            config.upstream.insecure = insecure;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cli = Cli::parse();

    let mut config = match cli.config.take() {
        Some(path) => read_config(&path)?,
        None => ExporterConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability.log_level);

    tracing::info!("upstream-status-exporter v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        listen_address = %config.telemetry.listen_address,
        metrics_path = %config.telemetry.metrics_path,
        scrape_uri = %config.upstream.scrape_uri,
        insecure = config.upstream.insecure,
        timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    let collector = Arc::new(StatusCollector::new(&config.upstream, &config.metrics)?);
    tracing::debug!(uri = collector.uri(), "Collector ready");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(&config.telemetry, collector);
    server
        .bind_and_run(&config.telemetry.bind_address(), server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
