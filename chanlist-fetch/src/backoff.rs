//! Retry delay computation
//!
//! Exponential backoff without jitter: randomness is applied once, at the
//! pacing step, so retry timing stays predictable.

use crate::error::AttemptError;
use std::time::Duration;

/// `min(cap, base * 2^attempt)` for the 0-based attempt that just failed
pub fn backoff_delay(attempt: u32, base: Duration, cap: Duration) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base.checked_mul(factor).unwrap_or(cap).min(cap)
}

/// Delay before retrying after `error`
///
/// A Retry-After hint lengthens the exponential delay but never past the cap.
pub fn retry_delay(attempt: u32, base: Duration, cap: Duration, error: &AttemptError) -> Duration {
    let delay = backoff_delay(attempt, base, cap);
    match error {
        AttemptError::RateLimited {
            retry_after: Some(hint),
            ..
        } => delay.max(*hint).min(cap),
        _ => delay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Duration = Duration::from_millis(500);
    const CAP: Duration = Duration::from_secs(8);

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(0, BASE, CAP), Duration::from_millis(500));
        assert_eq!(backoff_delay(1, BASE, CAP), Duration::from_millis(1000));
        assert_eq!(backoff_delay(3, BASE, CAP), Duration::from_millis(4000));
    }

    #[test]
    fn test_backoff_capped() {
        assert_eq!(backoff_delay(4, BASE, CAP), CAP);
        assert_eq!(backoff_delay(40, BASE, CAP), CAP);
        assert_eq!(backoff_delay(u32::MAX, BASE, CAP), CAP);
    }

    #[test]
    fn test_retry_after_extends_delay() {
        let error = AttemptError::RateLimited {
            status: 429,
            retry_after: Some(Duration::from_secs(3)),
        };
        assert_eq!(retry_delay(0, BASE, CAP, &error), Duration::from_secs(3));

        let huge = AttemptError::RateLimited {
            status: 429,
            retry_after: Some(Duration::from_secs(3600)),
        };
        assert_eq!(retry_delay(0, BASE, CAP, &huge), CAP);
    }

    #[test]
    fn test_plain_errors_use_backoff() {
        let error = AttemptError::Http { status: 500 };
        assert_eq!(retry_delay(2, BASE, CAP, &error), Duration::from_millis(2000));
    }
}
