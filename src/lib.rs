//! Upstream Status Exporter Library
//!
//! Scrapes the CSV status page of an nginx upstream health check and
//! republishes its per-backend counters for Prometheus.

pub mod collector;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use collector::StatusCollector;
pub use config::ExporterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
