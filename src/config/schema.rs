//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the exporter.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the exporter.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ExporterConfig {
    /// Metrics endpoint settings (bind address, path).
    pub telemetry: TelemetryConfig,

    /// Upstream status page settings.
    pub upstream: UpstreamConfig,

    /// Published metric naming.
    pub metrics: MetricsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Metrics endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Bind address (e.g., "0.0.0.0:9113").
    pub listen_address: String,

    /// Path under which metrics are exposed.
    pub metrics_path: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:9113".to_string(),
            metrics_path: "/metrics".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Listen address with a host-less `:port` expanded to `0.0.0.0:port`.
    pub fn bind_address(&self) -> String {
        if self.listen_address.starts_with(':') {
            format!("0.0.0.0{}", self.listen_address)
        } else {
            self.listen_address.clone()
        }
    }
}

/// Upstream status page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// URI of the upstream status page.
    pub scrape_uri: String,

    /// Skip TLS certificate verification for https URIs.
    pub insecure: bool,

    /// Fetch timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            scrape_uri: "http://localhost/nginx_status".to_string(),
            insecure: false,
            timeout_secs: 10,
        }
    }
}

/// Naming of the published series.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prefix applied to every series name.
    pub namespace: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            namespace: "nginx".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: ExporterConfig = toml::from_str("").unwrap();
        assert_eq!(config.telemetry.listen_address, "0.0.0.0:9113");
        assert_eq!(config.telemetry.metrics_path, "/metrics");
        assert_eq!(config.upstream.scrape_uri, "http://localhost/nginx_status");
        assert!(!config.upstream.insecure);
        assert_eq!(config.metrics.namespace, "nginx");
    }

    #[test]
    fn test_bind_address_without_host() {
        let config = TelemetryConfig {
            listen_address: ":9113".into(),
            ..TelemetryConfig::default()
        };
        assert_eq!(config.bind_address(), "0.0.0.0:9113");
        assert_eq!(TelemetryConfig::default().bind_address(), "0.0.0.0:9113");
    }

    #[test]
    fn test_partial_sections() {
        let config: ExporterConfig = toml::from_str(
            r#"
            [upstream]
            scrape_uri = "https://lb.internal/status?format=csv"
            insecure = true

            [telemetry]
            metrics_path = "/stats"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.scrape_uri, "https://lb.internal/status?format=csv");
        assert!(config.upstream.insecure);
        assert_eq!(config.upstream.timeout_secs, 10);
        assert_eq!(config.telemetry.metrics_path, "/stats");
        assert_eq!(config.telemetry.listen_address, "0.0.0.0:9113");
    }
}
