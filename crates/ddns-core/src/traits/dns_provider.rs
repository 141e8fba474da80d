// # DNS Provider Trait
//
// Defines the interface for updating a DNS record via a provider API.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     // Point the configured record at a new address
//     provider.update_record("192.168.1.1").await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Record state reported by the provider after a successful update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatedRecord {
    /// The record ID (provider-specific)
    pub id: String,
    /// The record content after the update
    pub content: String,
}

/// Trait for DNS provider implementations
///
/// The provider knows which record it manages (zone, record, name are part
/// of its construction). Each call is a single upsert.
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure
///
/// ## Forbidden Capabilities
/// - ❌ Spawn tasks or threads
/// - ❌ Implement retry logic or backoff (a failure waits for the next tick)
/// - ❌ Decide whether an update is needed (owned by `DdnsEngine`)
/// - ❌ Cache state beyond single request
///
/// ## Examples
///
/// ✅ **CORRECT**: Stateless single-shot API call
/// ```rust,ignore
/// async fn update_record(&self, ip: &str) -> Result<UpdatedRecord> {
///     let response = self.http_client
///         .put(format!("/zones/{}/dns_records/{}", self.zone_id, self.record_id))
///         .json(&serde_json::json!({ "content": ip }))
///         .send()
///         .await?; // Single API call
///
///     // Validate the provider's success flag, return Err otherwise
/// }
/// ```
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Point the managed record at `ip`
    ///
    /// # Idempotency
    ///
    /// The upsert is authoritative: sending the same content twice is
    /// expected to be a no-op upstream.
    ///
    /// # Returns
    ///
    /// - `Ok(UpdatedRecord)`: The provider confirmed the update
    /// - `Err(Error)`: Transport, encoding or provider-reported failure.
    ///   The caller must not treat the update as applied.
    async fn update_record(&self, ip: &str) -> Result<UpdatedRecord, crate::Error>;

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "cloudflare")
    fn provider_name(&self) -> &'static str;
}
