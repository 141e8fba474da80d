//! Error types for the DDNS updater
//!
//! Three classes matter to the check loop:
//! - configuration errors are fatal and stop the daemon before any network call
//! - network errors abandon the current check; the loop waits for the next tick
//! - provider errors mean the remote API refused the update; the remembered IP
//!   is left alone so the update is retried on the next detected difference

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (invalid values, unusable file contents)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors while reading the configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport failures: DNS, connect, timeout, body read, bad status
    #[error("Network error: {0}")]
    Network(String),

    /// The provider API answered but reported a failure
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message reported by the provider
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error must stop the daemon.
    ///
    /// Only configuration-class failures are fatal. Everything else is
    /// logged and the check loop carries on at the next tick.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Io(_))
    }
}
