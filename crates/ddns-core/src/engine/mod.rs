//! Core DDNS engine
//!
//! The DdnsEngine is the driver loop. It is responsible for:
//! - Asking the IpSource for the current public IP on every tick
//! - Comparing it with the last IP it successfully pushed
//! - Updating the DNS record via DnsProvider when they differ
//! - Remembering the new IP only after the provider confirmed the update
//!
//! ## Architecture
//!
//! ```text
//!                      ┌──────────────┐
//!        tick ───────▶ │ DdnsEngine   │ ──── EngineEvent ───▶ (monitoring)
//!                      │  last_ip     │
//!                      └──────────────┘
//!                        │          │
//!                        ▼          ▼
//!               ┌─────────────┐  ┌──────────────┐
//!               │  IpSource   │  │ DnsProvider  │
//!               │ (observe)   │  │ (upsert)     │
//!               └─────────────┘  └──────────────┘
//! ```
//!
//! ## States
//!
//! The loop alternates between two states:
//!
//! 1. **Checking**: entered immediately on start and on every tick
//! 2. **Idle**: waiting for the next tick of a fixed-period timer
//!
//! Every failure is logged and the loop returns to Idle. There is no
//! backoff and no retry counter; the next tick is the retry.

use crate::config::DdnsConfig;
use crate::error::Result;
use crate::traits::{DnsProvider, IpSource};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Capacity of the engine event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events emitted by the DdnsEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Engine started
    Started {
        interval: Duration,
    },

    /// The IP source could not be queried
    CheckFailed {
        error: String,
    },

    /// Observed IP equals the remembered IP
    IpUnchanged {
        current_ip: String,
    },

    /// Observed IP differs from the remembered IP
    IpChangeDetected {
        previous_ip: Option<String>,
        new_ip: String,
    },

    /// DNS update succeeded, remembered IP advanced
    UpdateSucceeded {
        new_ip: String,
        record_id: String,
    },

    /// DNS update failed, remembered IP unchanged
    UpdateFailed {
        new_ip: String,
        error: String,
    },

    /// Engine stopped
    Stopped {
        reason: String,
    },
}

/// Observed IPs are raw text; escape them so a stray newline cannot split a log line
fn printable(ip: &str) -> std::str::EscapeDebug<'_> {
    ip.escape_debug()
}

/// Result of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The IP source failed; nothing else was attempted
    ObserveFailed,
    /// Observed IP equals the remembered IP; no update
    Unchanged,
    /// The record was updated and the remembered IP advanced
    Updated,
    /// The provider call failed; the remembered IP was kept
    UpdateFailed,
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`], or [`DdnsEngine::detached()`] when nobody reads events
/// 2. Start with [`DdnsEngine::run()`]
/// 3. Engine runs until the process is killed
///
/// ## Threading
///
/// Single logical thread of control. The remembered IP is a plain field
/// mutated only by [`DdnsEngine::check()`], so no locking is involved.
///
/// ## Missed Ticks
///
/// A check that takes longer than the interval does not queue ticks:
/// missed ticks are skipped and the next one fires on the original schedule.
pub struct DdnsEngine {
    /// IP source for observing the public IP
    ip_source: Box<dyn IpSource>,

    /// DNS provider for updating the record
    provider: Box<dyn DnsProvider>,

    /// Period of the check timer
    interval: Duration,

    /// Last IP the provider confirmed; empty until the first success
    last_ip: String,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: DDNS configuration (validated here)
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: &DdnsConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let engine = Self {
            ip_source,
            provider,
            interval: config.interval(),
            last_ip: String::new(),
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Create an engine nobody listens to
    ///
    /// The event receiver is dropped immediately, so emitted events are
    /// discarded silently instead of filling the channel.
    pub fn detached(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: &DdnsConfig,
    ) -> Result<Self> {
        let (engine, _) = Self::new(ip_source, provider, config)?;
        Ok(engine)
    }

    /// Whether an event receiver is still attached
    pub fn has_event_listener(&self) -> bool {
        !self.event_tx.is_closed()
    }

    /// The last IP the provider confirmed (empty before the first success)
    pub fn last_ip(&self) -> &str {
        &self.last_ip
    }

    /// Run the engine
    ///
    /// Checks immediately, then once per interval. Never returns under
    /// normal operation; the process is stopped by being killed.
    pub async fn run(&mut self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Internal run implementation that accepts an optional shutdown signal
    ///
    /// # Parameters
    ///
    /// - `shutdown_rx`: Optional oneshot receiver to stop the loop (for testing)
    async fn run_internal(
        &mut self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        // The first tick completes immediately, which gives the startup check
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Checking public IP via {} every {} minute(s)",
            self.ip_source.source_name(),
            self.interval.as_secs() / 60
        );
        self.emit_event(EngineEvent::Started {
            interval: self.interval,
        });

        match shutdown_rx {
            Some(mut rx) => loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.check().await;
                    }

                    _ = &mut rx => {
                        info!("Shutdown signal received");
                        self.emit_event(EngineEvent::Stopped {
                            reason: "Shutdown signal".to_string(),
                        });
                        break;
                    }
                }
            },
            None => loop {
                ticker.tick().await;
                self.check().await;
            },
        }

        Ok(())
    }

    /// Perform one check: observe, compare, update if needed
    ///
    /// The remembered IP only advances when the provider confirms the
    /// update. A failed update leaves it untouched, so the next
    /// successful observation is again treated as a change.
    pub async fn check(&mut self) -> CheckOutcome {
        let current_ip = match self.ip_source.current().await {
            Ok(ip) => ip,
            Err(e) => {
                error!("Failed to get public IP: {}", e);
                self.emit_event(EngineEvent::CheckFailed {
                    error: e.to_string(),
                });
                return CheckOutcome::ObserveFailed;
            }
        };

        // Exact comparison on the raw observed value
        if current_ip == self.last_ip {
            debug!("Public IP unchanged: {}", printable(&current_ip));
            self.emit_event(EngineEvent::IpUnchanged { current_ip });
            return CheckOutcome::Unchanged;
        }

        let previous_ip = if self.last_ip.is_empty() {
            info!("First check, updating DNS record: {}", printable(&current_ip));
            None
        } else {
            info!(
                "Public IP changed: {} -> {}",
                printable(&self.last_ip),
                printable(&current_ip)
            );
            Some(self.last_ip.clone())
        };

        self.emit_event(EngineEvent::IpChangeDetected {
            previous_ip,
            new_ip: current_ip.clone(),
        });

        match self.provider.update_record(&current_ip).await {
            Ok(record) => {
                info!("DNS record updated successfully");
                debug!(
                    "{} record {} now has content {}",
                    self.provider.provider_name(),
                    record.id,
                    record.content
                );
                self.emit_event(EngineEvent::UpdateSucceeded {
                    new_ip: current_ip.clone(),
                    record_id: record.id,
                });
                self.last_ip = current_ip;
                CheckOutcome::Updated
            }
            Err(e) => {
                error!("Failed to update DNS record: {}", e);
                self.emit_event(EngineEvent::UpdateFailed {
                    new_ip: current_ip,
                    error: e.to_string(),
                });
                CheckOutcome::UpdateFailed
            }
        }
    }

    /// Emit an engine event
    ///
    /// Events are dropped when nobody listens; a full channel is logged.
    fn emit_event(&self, event: EngineEvent) {
        if let Err(TrySendError::Full(_)) = self.event_tx.try_send(event) {
            warn!("Event channel full, dropping event");
        }
    }

    /// Test-only helper to run the engine with a controlled shutdown signal
    ///
    /// **TESTING ONLY**: contract tests need to stop the loop. Production
    /// code should use `run()`, which has no shutdown path.
    pub async fn run_with_shutdown(
        &mut self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }
}
