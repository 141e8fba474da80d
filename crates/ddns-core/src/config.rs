//! Configuration for the DDNS updater
//!
//! The configuration is a flat JSON object read once at startup:
//!
//! ```json
//! {
//!   "api_token": "cf-token",
//!   "zone_id": "023e105f4ecef8ad9ca31a8372d0c353",
//!   "record_id": "372e67954025e0ba6aaa6d586b9e0b59",
//!   "domain": "home.example.com",
//!   "check_interval": 5
//! }
//! ```
//!
//! No defaults are applied: a missing key decodes to its zero value
//! (empty string or 0). `check_interval` is then rejected by [`DdnsConfig::validate`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Main DDNS configuration
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DdnsConfig {
    /// Cloudflare API token (sent as a bearer token)
    pub api_token: String,

    /// Cloudflare zone identifier
    pub zone_id: String,

    /// Cloudflare DNS record identifier within the zone
    pub record_id: String,

    /// Record name written into the update body (e.g. "home.example.com")
    pub domain: String,

    /// Minutes between IP checks
    pub check_interval: u64,

    /// Per-request HTTP timeout in seconds. 0 means no timeout.
    pub http_timeout_secs: u64,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for DdnsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DdnsConfig")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("record_id", &self.record_id)
            .field("domain", &self.domain)
            .field("check_interval", &self.check_interval)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

impl DdnsConfig {
    /// Load the configuration from a JSON file
    ///
    /// # Returns
    ///
    /// - `Ok(DdnsConfig)`: The decoded configuration (not yet validated)
    /// - `Err(Error::Io)`: The file could not be read
    /// - `Err(Error::Config)`: The file is not a valid configuration object
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Decode the configuration from a JSON string
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::Error::config(format!("invalid configuration JSON: {}", e)))
    }

    /// Validate the configuration
    ///
    /// A zero interval cannot drive a timer and is rejected. Empty
    /// identifiers are only warned about: the provider reports them as a
    /// failed update, which the loop already handles.
    pub fn validate(&self) -> crate::Result<()> {
        if self.check_interval == 0 {
            return Err(crate::Error::config("check_interval must be > 0 minutes"));
        }

        for (key, value) in [
            ("api_token", &self.api_token),
            ("zone_id", &self.zone_id),
            ("record_id", &self.record_id),
            ("domain", &self.domain),
        ] {
            if value.is_empty() {
                warn!("Configuration key '{}' is empty", key);
            }
        }

        Ok(())
    }

    /// Period of the check timer
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.check_interval.saturating_mul(60))
    }

    /// HTTP timeout for outbound requests, if one is configured
    pub fn http_timeout(&self) -> Option<Duration> {
        match self.http_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
