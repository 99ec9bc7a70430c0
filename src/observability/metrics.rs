//! Metrics exposition.
//!
//! # Responsibilities
//! - Encode gathered metric families in the Prometheus text format
//!
//! # Metrics
//! - `<ns>_up` (gauge): 1 if the last scrape fetched a successful response
//! - `<ns>_raise` (gauge): rise count by upstream, name, status
//! - `<ns>_fail` (gauge): non-zero fall count by upstream, name, status
//! - `<ns>_exporter_scrape_errors_total` (counter): parse failures by field

use prometheus::proto::MetricFamily;
use prometheus::{Encoder, TextEncoder};

/// Encode metric families in the text exposition format.
pub fn encode_text(families: &[MetricFamily]) -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Content type of [`encode_text`] output.
pub fn text_content_type() -> String {
    TextEncoder::new().format_type().to_string()
}
