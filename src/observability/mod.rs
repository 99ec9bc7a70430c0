//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!
//! Collector output:
//!     → metrics.rs (text exposition for the Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
