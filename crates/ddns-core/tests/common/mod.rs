//! Test doubles and common utilities for contract tests
//!
//! The doubles are cheap to clone and share their counters, so a test can
//! hand one copy to the engine and keep another to inspect.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, IpSource, UpdatedRecord};
use ddns_core::DdnsConfig;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpSource that replays scripted answers
///
/// Once the script is exhausted, the last answer is repeated.
#[derive(Clone)]
pub struct ScriptedIpSource {
    /// Pending answers (`Err` holds a network error message)
    script: Arc<Mutex<VecDeque<std::result::Result<String, String>>>>,
    /// Answer repeated after the script runs out
    last: Arc<Mutex<std::result::Result<String, String>>>,
    /// Call counter for current()
    current_call_count: Arc<AtomicUsize>,
}

impl ScriptedIpSource {
    /// Source that answers the given IPs in order
    pub fn new(ips: &[&str]) -> Self {
        Self::from_script(ips.iter().map(|ip| Ok(ip.to_string())).collect())
    }

    /// Source with an explicit script of successes and failures
    pub fn from_script(script: Vec<std::result::Result<String, String>>) -> Self {
        let last = script
            .last()
            .cloned()
            .unwrap_or_else(|| Err("no answer scripted".to_string()));

        Self {
            script: Arc::new(Mutex::new(script.into())),
            last: Arc::new(Mutex::new(last)),
            current_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn current_call_count(&self) -> usize {
        self.current_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<String> {
        self.current_call_count.fetch_add(1, Ordering::SeqCst);

        let answer = match self.script.lock().unwrap().pop_front() {
            Some(answer) => {
                *self.last.lock().unwrap() = answer.clone();
                answer
            }
            None => self.last.lock().unwrap().clone(),
        };

        answer.map_err(Error::network)
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A mock DnsProvider that records every update
///
/// Succeeds unless a failure was queued with [`MockDnsProvider::fail_next`].
#[derive(Clone)]
pub struct MockDnsProvider {
    /// IPs passed to update_record(), in call order
    updated_ips: Arc<Mutex<Vec<String>>>,
    /// Queued failure messages, consumed one per call
    failures: Arc<Mutex<VecDeque<String>>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            updated_ips: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Make the next update fail with a provider error
    pub fn fail_next(&self, message: &str) {
        self.failures.lock().unwrap().push_back(message.to_string());
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.updated_ips.lock().unwrap().len()
    }

    /// Get the IPs that were sent, in order
    pub fn updated_ips(&self) -> Vec<String> {
        self.updated_ips.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn update_record(&self, ip: &str) -> Result<UpdatedRecord> {
        self.updated_ips.lock().unwrap().push(ip.to_string());

        if let Some(message) = self.failures.lock().unwrap().pop_front() {
            return Err(Error::provider("mock", message));
        }

        Ok(UpdatedRecord {
            id: "r1".to_string(),
            content: ip.to_string(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(check_interval: u64) -> DdnsConfig {
    DdnsConfig {
        api_token: "test-token".to_string(),
        zone_id: "zone-1".to_string(),
        record_id: "record-1".to_string(),
        domain: "home.example.com".to_string(),
        check_interval,
        http_timeout_secs: 0,
    }
}
