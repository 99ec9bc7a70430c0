//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Reject metric names Prometheus would refuse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ExporterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ExporterConfig;

const RESERVED_PATH_CHARS: [char; 9] = [':', '*', '{', '}', '"', '\'', '<', '>', '&'];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("telemetry.listen_address {0:?} is not a socket address")]
    ListenAddress(String),

    #[error("telemetry.metrics_path {0:?} must start with '/' and must not be '/'")]
    MetricsPath(String),

    #[error("telemetry.metrics_path {path:?} must not contain {ch:?}")]
    MetricsPathChar { path: String, ch: char },

    #[error("upstream.scrape_uri {uri:?} is invalid: {reason}")]
    ScrapeUri { uri: String, reason: String },

    #[error("upstream.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("metrics.namespace {0:?} is not a valid metric name prefix")]
    Namespace(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ExporterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let telemetry = &config.telemetry;
    if telemetry.bind_address().parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::ListenAddress(telemetry.listen_address.clone()));
    }
    if !telemetry.metrics_path.starts_with('/') || telemetry.metrics_path == "/" {
        errors.push(ValidationError::MetricsPath(telemetry.metrics_path.clone()));
    }
    // Route captures and characters the landing page would have to escape.
    if let Some(ch) = telemetry.metrics_path.chars().find(|c| RESERVED_PATH_CHARS.contains(c)) {
        errors.push(ValidationError::MetricsPathChar {
            path: telemetry.metrics_path.clone(),
            ch,
        });
    }

    let upstream = &config.upstream;
    match Url::parse(&upstream.scrape_uri) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::ScrapeUri {
            uri: upstream.scrape_uri.clone(),
            reason: format!("unsupported scheme {:?}", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::ScrapeUri {
            uri: upstream.scrape_uri.clone(),
            reason: e.to_string(),
        }),
    }
    if upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if !is_valid_namespace(&config.metrics.namespace) {
        errors.push(ValidationError::Namespace(config.metrics.namespace.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_valid_namespace(namespace: &str) -> bool {
    let mut chars = namespace.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
