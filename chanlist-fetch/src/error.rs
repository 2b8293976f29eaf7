//! Fetch error taxonomy

use std::time::Duration;
use thiserror::Error;

/// Why a single attempt failed; every variant is retryable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// Connection, TLS, or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Attempt exceeded its time budget
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Non-2xx response
    #[error("HTTP error {status}")]
    Http { status: u16 },

    /// 429 or 503, optionally with a Retry-After hint
    #[error("Rate limited (HTTP {status})")]
    RateLimited {
        status: u16,
        retry_after: Option<Duration>,
    },
}

/// Classified failure of a whole fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL could not be parsed or has no host
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),

    /// Response carried an anti-bot marker; not retried
    #[error("Blocked fetching {url} (HTTP {status}): page matched '{marker}'")]
    Blocked {
        url: String,
        status: u16,
        marker: String,
    },

    /// Retry budget spent
    #[error("Gave up on {url} after {attempts} attempt(s): {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        last: AttemptError,
    },

    /// Caller cancelled the fetch
    #[error("Fetch of {url} cancelled")]
    Cancelled { url: String },
}

impl FetchError {
    /// True for content guard hits
    pub fn is_blocked(&self) -> bool {
        matches!(self, FetchError::Blocked { .. })
    }

    /// True when the retry budget ran out on a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            FetchError::Exhausted {
                last: AttemptError::Timeout(_),
                ..
            }
        )
    }

    /// Last attempt error for exhausted fetches
    pub fn last_attempt_error(&self) -> Option<&AttemptError> {
        match self {
            FetchError::Exhausted { last, .. } => Some(last),
            _ => None,
        }
    }
}
