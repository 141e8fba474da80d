// # Cloudflare DNS Provider
//
// This crate provides a Cloudflare DNS provider implementation for the DDNS updater.
//
// - ✅ Makes exactly one HTTP request per update (PUT, an authoritative upsert)
// - ✅ Full error propagation to the engine
// - ✅ Validates Cloudflare's `success` flag and surfaces its error messages
// - ❌ NO retry logic (the engine retries on the next tick)
// - ❌ NO zone or record discovery (both IDs come from the configuration)
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use ddns_core::timestamp::local_timestamp;
use ddns_core::{DdnsConfig, DnsProvider, Error, Result, UpdatedRecord};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// TTL written with every update (seconds)
const RECORD_TTL: u32 = 120;

/// Request body of the record update
#[derive(Debug, Serialize)]
struct UpdatePayload<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    name: &'a str,
    content: &'a str,
    ttl: u32,
    proxied: bool,
    comment: String,
}

impl<'a> UpdatePayload<'a> {
    /// A proxied A record with a timestamped comment
    fn a_record(name: &'a str, content: &'a str, timestamp: &str) -> Self {
        Self {
            record_type: "A",
            name,
            content,
            ttl: RECORD_TTL,
            proxied: true,
            comment: format!("DDNS: {}", timestamp),
        }
    }
}

/// Cloudflare API response envelope
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CloudflareResponse {
    #[serde(deserialize_with = "null_as_default")]
    success: bool,
    #[serde(deserialize_with = "null_as_default")]
    errors: Vec<ApiMessage>,
    result: Option<DnsRecord>,
}

/// Decode an explicit `null` the same way as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiMessage {
    code: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    message: String,
}

impl std::fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "[{}] {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DnsRecord {
    #[serde(deserialize_with = "null_as_default")]
    id: String,
    #[serde(deserialize_with = "null_as_default")]
    content: String,
}

impl CloudflareResponse {
    /// Turn the envelope into the update outcome
    fn into_result(self) -> Result<UpdatedRecord> {
        if !self.success {
            let messages = self
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::provider(
                "cloudflare",
                format!("Cloudflare API error: [{}]", messages),
            ));
        }

        let record = self.result.unwrap_or_default();
        Ok(UpdatedRecord {
            id: record.id,
            content: record.content,
        })
    }
}

/// Cloudflare DNS provider
///
/// Manages a single record addressed by zone ID and record ID.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Zone ID
    zone_id: String,

    /// Record ID within the zone
    record_id: String,

    /// Record name sent with every update
    domain: String,

    /// API base URL (overridable for tests)
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("record_id", &self.record_id)
            .field("domain", &self.domain)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `zone_id`: Zone containing the record
    /// - `record_id`: Record to update
    /// - `domain`: Record name sent with every update
    /// - `timeout`: Optional request timeout. `None` waits indefinitely.
    ///
    /// # Security
    ///
    /// The API token will NEVER be logged or displayed in error messages.
    pub fn new(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        record_id: impl Into<String>,
        domain: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token: api_token.into(),
            zone_id: zone_id.into(),
            record_id: record_id.into(),
            domain: domain.into(),
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client,
        })
    }

    /// Create from the daemon configuration
    pub fn from_config(config: &DdnsConfig) -> Result<Self> {
        Self::new(
            config.api_token.clone(),
            config.zone_id.clone(),
            config.record_id.clone(),
            config.domain.clone(),
            config.http_timeout(),
        )
    }

    /// Point the provider at a different API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// URL of the managed record
    pub fn record_url(&self) -> String {
        format!(
            "{}/zones/{}/dns_records/{}",
            self.base_url.trim_end_matches('/'),
            self.zone_id,
            self.record_id
        )
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// Point the managed record at `ip`
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// Authorization: Bearer <token>
    /// Content-Type: application/json
    ///
    /// {"type":"A","name":"home.example.com","content":"1.2.3.4",
    ///  "ttl":120,"proxied":true,"comment":"DDNS: 2024-01-01 12:00:00"}
    /// ```
    ///
    /// The response body is decoded whatever the HTTP status: Cloudflare
    /// reports failures in-body with `success: false`.
    async fn update_record(&self, ip: &str) -> Result<UpdatedRecord> {
        let url = self.record_url();
        let payload = UpdatePayload::a_record(&self.domain, ip, &local_timestamp());
        let body = serde_json::to_vec(&payload)?;

        tracing::debug!("Updating Cloudflare DNS record {} -> {}", self.domain, ip);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::network(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;

        let parsed: CloudflareResponse = serde_json::from_str(&text)?;
        if !status.is_success() {
            tracing::debug!("Cloudflare answered HTTP {}", status);
        }

        let record = parsed.into_result()?;
        tracing::info!("Cloudflare DNS record updated, new IP: {}", ip);
        Ok(record)
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> CloudflareProvider {
        CloudflareProvider::new("test_token", "zone-1", "record-1", "home.example.com", None)
            .unwrap()
    }

    #[test]
    fn test_record_url() {
        assert_eq!(
            provider().record_url(),
            "https://api.cloudflare.com/client/v4/zones/zone-1/dns_records/record-1"
        );

        let local = provider().with_base_url("http://127.0.0.1:8080/");
        assert_eq!(
            local.record_url(),
            "http://127.0.0.1:8080/zones/zone-1/dns_records/record-1"
        );
    }

    #[test]
    fn test_payload_shape() {
        let payload = UpdatePayload::a_record("home.example.com", "1.2.3.4", "2024-01-01 12:00:00");
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "A",
                "name": "home.example.com",
                "content": "1.2.3.4",
                "ttl": 120,
                "proxied": true,
                "comment": "DDNS: 2024-01-01 12:00:00",
            })
        );
    }

    #[test]
    fn test_failure_embeds_provider_messages() {
        let response: CloudflareResponse = serde_json::from_str(
            r#"{"success": false, "errors": [{"message": "bad token"}, {"code": 81044, "message": "Record does not exist."}]}"#,
        )
        .unwrap();

        let err = response.into_result().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("bad token"), "{}", text);
        assert!(text.contains("[81044] Record does not exist."), "{}", text);
        assert!(matches!(err, Error::Provider { .. }));
    }

    #[test]
    fn test_success_returns_record() {
        let response: CloudflareResponse = serde_json::from_str(
            r#"{"success": true, "errors": [], "result": {"id": "r1", "content": "5.6.7.8"}}"#,
        )
        .unwrap();

        let record = response.into_result().unwrap();
        assert_eq!(record.id, "r1");
        assert_eq!(record.content, "5.6.7.8");
    }

    #[test]
    fn test_empty_envelope_is_failure() {
        let response: CloudflareResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_result().is_err());
    }

    #[test]
    fn test_null_fields_decode_as_absent() {
        let response: CloudflareResponse =
            serde_json::from_str(r#"{"success": false, "errors": null, "result": null}"#).unwrap();
        let err = response.into_result().unwrap_err();
        assert!(matches!(err, Error::Provider { .. }), "got {:?}", err);

        let response: CloudflareResponse = serde_json::from_str(
            r#"{"success": false, "errors": [{"code": 1000, "message": null}]}"#,
        )
        .unwrap();
        assert!(response.into_result().unwrap_err().to_string().contains("[1000]"));

        let response: CloudflareResponse = serde_json::from_str(
            r#"{"success": true, "errors": null, "result": {"id": "r1", "content": null}}"#,
        )
        .unwrap();
        let record = response.into_result().unwrap();
        assert_eq!(record.id, "r1");
        assert_eq!(record.content, "");
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(provider().provider_name(), "cloudflare");
    }

    #[test]
    fn test_api_token_not_exposed_in_debug() {
        let provider = CloudflareProvider::new(
            "secret_token_12345",
            "zone",
            "record",
            "example.com",
            None,
        )
        .unwrap();

        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(debug_str.contains("CloudflareProvider"));
    }
}
