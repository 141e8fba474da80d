// # IP Source Trait
//
// Defines the interface for observing the host's current public IP address.
//
// ## Implementations
//
// - HTTP echo service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let current_ip = source.current().await?;
//     println!("Public IP: {}", current_ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for IP source implementations
///
/// An IP source is an **observer**, not a decision-maker: it answers
/// "what is my address right now" and nothing else.
///
/// ## Forbidden Capabilities
/// - ❌ Perform DNS updates (use `DnsProvider`)
/// - ❌ Remember previous answers (the remembered IP is owned by `DdnsEngine`)
/// - ❌ Retry or sleep (a failed observation waits for the next tick)
///
/// # Observed Value
///
/// The returned string is the raw answer of the source. Implementations do
/// not trim or parse it; the engine compares it byte-for-byte.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The observed address, exactly as reported
    /// - `Err(Error::Network)`: If the source could not be reached or read
    async fn current(&self) -> Result<String, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
