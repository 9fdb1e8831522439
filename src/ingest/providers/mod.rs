// src/ingest/providers/mod.rs
pub mod google_news;
pub mod rss_feed;

use anyhow::{Context, Result};
use std::time::Duration;

pub const USER_AGENT: &str = "epl-sentiment-tracker/0.1";

/// Shared HTTP client for feed fetching.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(4))
        .timeout(Duration::from_secs(10))
        .build()
        .context("building feed http client")
}

/// GET a feed body, treating non-2xx as an error.
pub(crate) async fn get_text(req: reqwest::RequestBuilder, what: &str) -> Result<String> {
    let resp = req
        .send()
        .await
        .with_context(|| format!("{what} http get()"))?
        .error_for_status()
        .with_context(|| format!("{what} http status"))?;
    resp.text()
        .await
        .with_context(|| format!("{what} http .text()"))
}
