//! Outbound fetch of the audited page.
//!
//! One GET per audit with a browser-like user agent. No retries; redirects
//! follow the client library defaults. Non-2xx statuses are treated as
//! fetch failures.

use std::time::Duration;

use crate::config::Config;
use crate::error::{AuditError, Result};

/// Build the shared HTTP client from config.
pub fn build_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.fetch.user_agent.clone())
        .timeout(Duration::from_millis(config.fetch.timeout_ms))
        .build()
        .map_err(|e| AuditError::Internal {
            message: format!("Failed to build HTTP client: {}", e),
        })
}

/// Fetch the raw HTML body of the target URL.
///
/// The body is read in chunks and rejected once it exceeds `max_body_bytes`,
/// so an oversized page is never buffered in full.
pub async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
    max_body_bytes: usize,
) -> Result<String> {
    let mut response = client.get(url).send().await?.error_for_status()?;

    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > max_body_bytes {
            return Err(AuditError::Fetch {
                message: format!("response body exceeds {} byte cap", max_body_bytes),
            });
        }
        body.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}
