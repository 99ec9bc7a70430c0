//! Upstream status collector.
//!
//! # Data Flow
//! ```text
//! metrics request
//!     → StatusCollector::collect (takes the scrape lock)
//!     → fetch.rs (GET status page)
//!     → parse.rs (CSV rows → StatusReport)
//!     → apply report to gauges / error counters
//!     → gather metric families
//!     → release lock, hand families to the encoder
//! ```
//!
//! # Design Decisions
//! - One async mutex spans scrape and gather, so every caller sees a single
//!   consistent scrape
//! - Transport and status failures only flip `up` to 0; the previous backend
//!   values stay published
//! - Backend gauges are cleared before each successful parse is applied
//! - Scrape error counters are cumulative for the process lifetime

pub mod fetch;
pub mod parse;

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry};
use reqwest::Client;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::{MetricsConfig, UpstreamConfig};
use self::fetch::{build_client, fetch_status, ScrapeError};
use self::parse::{parse_status, Field, StatusReport};

/// Label names of the per-backend gauge families.
pub const BACKEND_LABELS: [&str; 3] = ["upstream", "name", "status"];

/// Label name of the scrape error counter.
pub const ERROR_LABEL: &str = "collector";

/// Errors raised while constructing a collector.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to register metric: {0}")]
    Metric(#[from] prometheus::Error),
}

/// Scrapes an upstream status page and exposes its counters.
pub struct StatusCollector {
    uri: String,
    client: Client,

    registry: Registry,
    descs: Vec<Desc>,

    up: IntGauge,
    raise: IntGaugeVec,
    fail: IntGaugeVec,
    scrape_errors: IntCounterVec,

    /// Held across scrape and gather.
    scrape_lock: Mutex<()>,
}

impl StatusCollector {
    /// Create a collector for the configured upstream.
    pub fn new(
        upstream: &UpstreamConfig,
        metrics: &MetricsConfig,
    ) -> Result<Self, CollectorError> {
        let client = build_client(upstream)?;
        Self::with_client(upstream.scrape_uri.clone(), client, metrics)
    }

    /// Create a collector around an existing HTTP client.
    pub fn with_client(
        uri: String,
        client: Client,
        metrics: &MetricsConfig,
    ) -> Result<Self, CollectorError> {
        let ns = metrics.namespace.as_str();

        let up = IntGauge::with_opts(
            Opts::new("up", "Whether the upstream status page was fetched successfully.")
                .namespace(ns),
        )?;
        let raise = IntGaugeVec::new(
            Opts::new("raise", "Rise count reported for each backend.").namespace(ns),
            &BACKEND_LABELS,
        )?;
        let fail = IntGaugeVec::new(
            Opts::new("fail", "Non-zero fall count reported for each backend.").namespace(ns),
            &BACKEND_LABELS,
        )?;
        let scrape_errors = IntCounterVec::new(
            Opts::new(
                "scrape_errors_total",
                "Number of fields that failed to parse while scraping the upstream.",
            )
            .namespace(ns)
            .subsystem("exporter"),
            &[ERROR_LABEL],
        )?;

        // Both categories are published from the start, at zero.
        for field in Field::ALL {
            scrape_errors.with_label_values(&[field.as_str()]);
        }

        let registry = Registry::new();
        registry.register(Box::new(up.clone()))?;
        registry.register(Box::new(raise.clone()))?;
        registry.register(Box::new(fail.clone()))?;
        registry.register(Box::new(scrape_errors.clone()))?;

        let descs = up
            .desc()
            .into_iter()
            .chain(raise.desc())
            .chain(fail.desc())
            .chain(scrape_errors.desc())
            .cloned()
            .collect();

        Ok(Self {
            uri,
            client,
            registry,
            descs,
            up,
            raise,
            fail,
            scrape_errors,
            scrape_lock: Mutex::new(()),
        })
    }

    /// The upstream status page location.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Descriptors of every series this collector can publish.
    pub fn describe(&self) -> &[Desc] {
        &self.descs
    }

    /// Scrape the upstream once and return the resulting snapshot.
    ///
    /// Families are sorted by name and series by label values. Scrape
    /// failures never surface here; they show up as `up == 0`.
    pub async fn collect(&self) -> Vec<MetricFamily> {
        let _guard = self.scrape_lock.lock().await;
        self.scrape().await;
        self.registry.gather()
    }

    async fn scrape(&self) {
        let body = match fetch_status(&self.client, &self.uri).await {
            Ok(body) => body,
            Err(ScrapeError::Transport(e)) => {
                tracing::error!(uri = %self.uri, error = %e, "Error calling upstream status page");
                self.up.set(0);
                return;
            }
            Err(ScrapeError::Status { status, body }) => {
                tracing::warn!(
                    uri = %self.uri,
                    status = %status,
                    body = %body,
                    "Upstream status page returned an error"
                );
                self.up.set(0);
                return;
            }
        };

        self.up.set(1);

        let report = parse_status(&body);
        self.apply(&report);

        tracing::debug!(
            uri = %self.uri,
            backends = report.backends.len(),
            raise_errors = report.error_count(Field::Raise),
            fail_errors = report.error_count(Field::Fail),
            "Scrape complete"
        );
    }

    fn apply(&self, report: &StatusReport) {
        self.raise.reset();
        self.fail.reset();

        for (key, counts) in &report.backends {
            let labels = key.label_values();
            if let Some(raise) = counts.raise {
                self.raise.with_label_values(&labels).set(clamp(raise));
            }
            if let Some(fail) = counts.fail {
                self.fail.with_label_values(&labels).set(clamp(fail));
            }
        }

        for error in &report.errors {
            tracing::debug!(error = %error, "Error parsing status line");
            self.scrape_errors.with_label_values(&[error.field().as_str()]).inc();
        }
    }
}

fn clamp(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
