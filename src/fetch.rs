use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

pub const LISTING_URL: &str = "https://tasman.tas.gov.au/advertised-applications/";
const TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetch the listing page body. Any network error, timeout or non-2xx status is an error.
pub async fn fetch_listing(url: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")?;

    info!("Fetching page content from: {}", url);
    let html = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Bad response from {}", url))?
        .text()
        .await
        .context("Failed to read page body")?;

    info!("Successfully fetched page content ({} bytes)", html.len());
    Ok(html)
}
