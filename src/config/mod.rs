//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (binary)
//!     → validation.rs (semantic checks)
//!     → ExporterConfig (validated, immutable)
//!     → handed to the collector and server at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{parse_config, read_config, ConfigError};
pub use schema::ExporterConfig;
pub use schema::MetricsConfig;
pub use schema::ObservabilityConfig;
pub use schema::TelemetryConfig;
pub use schema::UpstreamConfig;
pub use validation::{validate_config, ValidationError};
