// # ddns-core
//
// Core library for the DDNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for dynamic DNS updates:
// - **IpSource**: Trait for observing the current public IP
// - **DnsProvider**: Trait for updating a DNS record via a provider API
// - **DdnsEngine**: Timer-driven loop that detects IP drift and triggers updates
// - **DdnsConfig**: The JSON configuration read once at startup
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Single Owner**: The remembered IP lives inside the engine and nowhere else
// 3. **Library-First**: All core functionality can be used as a library
// 4. **No Hidden Retries**: Every failure is logged and retried on the next tick

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod timestamp;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider, UpdatedRecord};
pub use engine::{DdnsEngine, EngineEvent, CheckOutcome};
pub use config::DdnsConfig;
pub use error::{Error, Result};
