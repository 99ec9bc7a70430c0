//! Status page retrieval.
//!
//! # Responsibilities
//! - Build the HTTP client (timeout, TLS verification policy)
//! - Fetch the status document with a single GET
//! - Classify failures as transport or status errors

use std::time::Duration;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::UpstreamConfig;

/// Longest body excerpt kept when the upstream answers with an error status.
pub const MAX_DIAGNOSTIC_BODY: usize = 512;

/// Why a status page could not be fetched.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Connection, TLS or timeout failure. No response was received.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered outside 2xx-3xx.
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Build the client used for every scrape.
pub fn build_client(config: &UpstreamConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .danger_accept_invalid_certs(config.insecure)
        .user_agent(concat!("upstream-status-exporter/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Fetch the status document from `uri`.
pub async fn fetch_status(client: &Client, uri: &str) -> Result<String, ScrapeError> {
    let response = client.get(uri).send().await?;

    let status = response.status();
    if !(status.is_success() || status.is_redirection()) {
        let body = match response.text().await {
            Ok(text) => truncate(text, MAX_DIAGNOSTIC_BODY),
            Err(e) => e.to_string(),
        };
        return Err(ScrapeError::Status { status, body });
    }

    // Body read failures (e.g. timeout mid-stream) are transport failures.
    Ok(response.text().await?)
}

fn truncate(mut text: String, max: usize) -> String {
    if text.len() > max {
        let mut cut = max;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    text
}
