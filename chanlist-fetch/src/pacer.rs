//! Per-host dispatch pacing
//!
//! Each call reserves the next dispatch slot for a host under the lock and
//! records it immediately, before any waiting or network I/O. Concurrent
//! callers therefore queue up behind each other's reservations instead of
//! all observing the same stale timestamp. The wait itself happens outside
//! the lock, so slow hosts never delay other hosts.
//!
//! A caller that gives up before its slot arrives hands the reservation back
//! with [`HostPacer::release`], so abandoned slots do not push out later
//! requests.

use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// A dispatch slot handed out by [`HostPacer::reserve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    /// Earliest instant the request may be dispatched
    pub slot: Instant,
    previous: Option<Instant>,
}

/// Last reserved dispatch instant per host
#[derive(Debug, Default)]
pub struct HostPacer {
    last_dispatch: Mutex<HashMap<String, Instant>>,
}

impl HostPacer {
    /// Create an empty pacer
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next dispatch slot for `host`
    ///
    /// The slot is `max(now, last + min_interval) + uniform(0, jitter)`.
    /// The caller must not dispatch before `slot`.
    pub fn reserve(&self, host: &str, min_interval: Duration, jitter: Duration) -> Reservation {
        let jitter = random_jitter(jitter);
        let mut last_dispatch = self
            .last_dispatch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let now = Instant::now();
        let previous = last_dispatch.get(host).copied();
        let earliest = match previous {
            Some(previous) => now.max(previous + min_interval),
            None => now,
        };
        let slot = earliest + jitter;
        last_dispatch.insert(host.to_string(), slot);
        Reservation { slot, previous }
    }

    /// Give back a slot that was never used for a dispatch
    ///
    /// The host's entry reverts to what it was before the reservation, but
    /// only while the reservation is still the latest one. Once another
    /// caller has reserved behind it the entry is left alone and `false` is
    /// returned.
    pub fn release(&self, host: &str, reservation: Reservation) -> bool {
        let mut last_dispatch = self
            .last_dispatch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if last_dispatch.get(host) != Some(&reservation.slot) {
            return false;
        }
        match reservation.previous {
            Some(previous) => {
                last_dispatch.insert(host.to_string(), previous);
            }
            None => {
                last_dispatch.remove(host);
            }
        }
        true
    }

    /// Last reserved slot for `host`
    pub fn last_dispatch(&self, host: &str) -> Option<Instant> {
        self.last_dispatch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(host)
            .copied()
    }

    /// Number of hosts seen so far
    pub fn host_count(&self) -> usize {
        self.last_dispatch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

fn random_jitter(max: Duration) -> Duration {
    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}
