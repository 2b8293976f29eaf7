//! Per-call fetch options

use chanlist_common::config::FetcherSettings;
use std::time::Duration;

/// Pacing, timeout and retry knobs for one fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Minimum spacing between dispatches to the same host
    pub min_interval: Duration,
    /// Upper bound of the uniform random delay added to every pacing wait
    pub jitter: Duration,
    /// Time budget of a single attempt
    pub timeout: Duration,
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Backoff after the first failed attempt
    pub backoff_base: Duration,
    /// Backoff ceiling
    pub backoff_cap: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from(&FetcherSettings::default())
    }
}

impl From<&FetcherSettings> for FetchOptions {
    fn from(settings: &FetcherSettings) -> Self {
        Self {
            min_interval: Duration::from_millis(settings.min_interval_ms),
            jitter: Duration::from_millis(settings.jitter_ms),
            timeout: Duration::from_millis(settings.timeout_ms),
            max_retries: settings.max_retries,
            backoff_base: Duration::from_millis(settings.backoff_base_ms),
            backoff_cap: Duration::from_millis(settings.backoff_cap_ms),
        }
    }
}

impl FetchOptions {
    /// Same options with a different retry budget
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}
