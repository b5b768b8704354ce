// src/core/net.rs
//! Page fetching. The pipeline only needs "GET this URL as text", so that
//! is the seam: `HttpFetcher` for real runs, stubs in tests.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::config::consts::USER_AGENT;
use crate::error::{Error, Provider, Result};

pub trait PageFetcher {
    /// Fetch `url` and return the body. Any failure is reported as
    /// `ProviderUnavailable` for `provider`.
    fn get_text(&self, provider: Provider, url: &str) -> Result<String>;
}

/// Blocking HTTP GET. One request per call: no retry, no backoff.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn get_text(&self, provider: Provider, url: &str) -> Result<String> {
        debug!(%provider, url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::unavailable(provider, format!("request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::unavailable(provider, format!("HTTP {status} from {url}")));
        }

        let body = resp
            .text()
            .map_err(|e| Error::unavailable(provider, format!("reading body from {url}: {e}")))?;
        info!(%provider, url, bytes = body.len(), "fetched");
        Ok(body)
    }
}
