//! Core traits for the DDNS updater
//!
//! This module defines the abstract interfaces the check loop drives.
//!
//! - [`IpSource`]: Observe the current public IP address
//! - [`DnsProvider`]: Push an IP address to a DNS record via a provider API

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, UpdatedRecord};
