// ============================================================
// Layer 6 — HTTP fetcher
// ============================================================
// Blocking reqwest client behind the PageFetcher trait.
//
// Redirects are followed by reqwest, so the status seen by the
// caller is the final one. Non-success codes come back as data,
// never as errors; only transport failures are errors.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

use crate::domain::archive::FetchResponse;
use crate::domain::traits::PageFetcher;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Cannot build HTTP client")?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("GET {url} failed"))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .with_context(|| format!("Reading body of {url} failed"))?;

        tracing::debug!("GET {} → {} ({} bytes)", url, status, body.len());
        Ok(FetchResponse::new(status, body.to_vec()))
    }
}
