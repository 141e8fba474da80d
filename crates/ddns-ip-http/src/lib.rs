// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for the DDNS updater.
//
// ## Architecture
//
// Fetches the current public IP from an external echo service
// (https://api.ipify.org by default) with a single plain GET.
// The engine owns the schedule; this source only answers when asked.
//
// ## Raw Answers
//
// The body is returned exactly as received, decoded as UTF-8. No trimming
// and no parsing: the engine compares the raw text with the last value it
// pushed, and the same text is written into the DNS record.

use ddns_core::{DdnsConfig, Error, IpSource, Result};
use std::time::Duration;

/// Default IP echo service, returns the plain text IP
pub const DEFAULT_IP_SERVICE: &str = "https://api.ipify.org";

/// HTTP-based IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source against [`DEFAULT_IP_SERVICE`]
    ///
    /// # Parameters
    ///
    /// - `timeout`: Optional request timeout. `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        Self::with_url(DEFAULT_IP_SERVICE, timeout)
    }

    /// Create with a custom echo service URL
    pub fn with_url(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create from the daemon configuration
    pub fn from_config(config: &DdnsConfig) -> Result<Self> {
        Self::new(config.http_timeout())
    }

    /// The URL this source queries
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("Request to {} failed: {}", self.url, e)))?;

        // An error page is not an IP address
        if !response.status().is_success() {
            return Err(Error::network(format!(
                "{} returned HTTP {}",
                self.url,
                response.status()
            )));
        }

        let ip = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;

        tracing::debug!("{} answered {:?}", self.url, ip);
        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
