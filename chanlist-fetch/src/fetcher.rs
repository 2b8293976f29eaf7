//! Resilient fetcher
//!
//! Every attempt, retries included, goes through the host pacer first. The
//! caller's cancellation token is observed at all three suspension points:
//! the pacing wait, the in-flight attempt, and the backoff wait.

use crate::backoff::retry_delay;
use crate::error::{AttemptError, FetchError};
use crate::guard::ContentGuard;
use crate::options::FetchOptions;
use crate::pacer::HostPacer;
use crate::transport::{HttpTransport, RawResponse, Transport};
use chanlist_common::config::FetcherSettings;
use reqwest::Url;
use std::sync::Arc;
use tokio::time::{sleep, sleep_until, timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Paced, retrying page fetcher
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    pacer: HostPacer,
    guard: ContentGuard,
    defaults: FetchOptions,
}

impl Fetcher {
    /// Fetcher over a reqwest client configured from settings
    pub fn new(settings: &FetcherSettings) -> Result<Self, FetchError> {
        let defaults = FetchOptions::from(settings);
        let transport = HttpTransport::new(&settings.user_agent, defaults.timeout)?;
        let guard = match &settings.block_markers {
            Some(markers) => ContentGuard::new(markers, settings.guard_scan_bytes),
            None => ContentGuard::with_default_markers(settings.guard_scan_bytes),
        };
        Ok(Self::with_transport(Arc::new(transport), guard, defaults))
    }

    /// Fetcher over any transport
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        guard: ContentGuard,
        defaults: FetchOptions,
    ) -> Self {
        Self {
            transport,
            pacer: HostPacer::new(),
            guard,
            defaults,
        }
    }

    /// Options built from the fetcher's settings
    pub fn default_options(&self) -> &FetchOptions {
        &self.defaults
    }

    /// Pacing state shared by every fetch on this instance
    pub fn pacer(&self) -> &HostPacer {
        &self.pacer
    }

    /// Fetch `url`, returning the raw body text
    pub async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String, FetchError> {
        self.fetch_until_cancelled(url, options, &CancellationToken::new())
            .await
    }

    /// Fetch `url` unless `cancel` fires first
    pub async fn fetch_until_cancelled(
        &self,
        url: &str,
        options: &FetchOptions,
        cancel: &CancellationToken,
    ) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let host = parsed
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl {
                url: url.to_string(),
                reason: "URL has no host".to_string(),
            })?
            .to_ascii_lowercase();
        let cancelled = || FetchError::Cancelled {
            url: url.to_string(),
        };

        let mut attempt: u32 = 0;
        loop {
            let reservation = self
                .pacer
                .reserve(&host, options.min_interval, options.jitter);
            let wait = reservation.slot.saturating_duration_since(Instant::now());
            if !wait.is_zero() {
                debug!(host = %host, wait_ms = wait.as_millis() as u64, "Pacing request");
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    // nothing was sent; the slot must not space later requests
                    self.pacer.release(&host, reservation);
                    return Err(cancelled());
                }
                _ = sleep_until(reservation.slot) => {}
            }

            trace!(url = %parsed, attempt, "Dispatching request");
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled()),
                result = timeout(options.timeout, self.transport.get(&parsed)) => result,
            };

            let error = match outcome {
                Err(_) => AttemptError::Timeout(options.timeout),
                Ok(Err(reason)) => AttemptError::Transport(reason),
                Ok(Ok(response)) => {
                    if let Some(marker) = self.guard.inspect(&response.body) {
                        debug!(url = %parsed, status = response.status, marker, "Content guard tripped");
                        return Err(FetchError::Blocked {
                            url: url.to_string(),
                            status: response.status,
                            marker: marker.to_string(),
                        });
                    }
                    if response.is_success() {
                        trace!(url = %parsed, attempt, bytes = response.body.len(), "Fetched");
                        return Ok(response.body);
                    }
                    status_error(&response)
                }
            };

            if attempt >= options.max_retries {
                return Err(FetchError::Exhausted {
                    url: url.to_string(),
                    attempts: attempt + 1,
                    last: error,
                });
            }

            let delay = retry_delay(attempt, options.backoff_base, options.backoff_cap, &error);
            debug!(
                url = %parsed,
                attempt,
                error = %error,
                delay_ms = delay.as_millis() as u64,
                "Attempt failed, backing off"
            );
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled()),
                _ = sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}

fn status_error(response: &RawResponse) -> AttemptError {
    match response.status {
        429 | 503 => AttemptError::RateLimited {
            status: response.status,
            retry_after: response.retry_after,
        },
        status => AttemptError::Http { status },
    }
}
