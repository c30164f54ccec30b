//! Runtime view of the poller configuration

use crate::constants::{COINGECKO_API_URL, DEFAULT_RETRY_AFTER_SECS, POLL_INTERVAL_SECS};
use std::time::Duration;

/// Settings shared by the poller and the tracker loop
///
/// Production code uses `PollerConfig::default()`. Tests override the base
/// URL to talk to a local stub and shorten the intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// API base URL, without the endpoint path
    pub base_url: String,

    /// Pause between two polls, whatever the outcome
    pub poll_interval: Duration,

    /// Wait applied to a 429 without a usable `Retry-After` header
    pub default_retry_after: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
            default_retry_after: Duration::from_secs(DEFAULT_RETRY_AFTER_SECS),
        }
    }
}

impl PollerConfig {
    /// Returns a copy pointing at a different API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns a copy with a different poll interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}
