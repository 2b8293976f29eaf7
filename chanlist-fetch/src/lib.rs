//! chanlist-fetch - resilient page fetcher
//!
//! Fetches channel pages with:
//! - per-host pacing (minimum interval plus random jitter between dispatches)
//! - a per-attempt timeout
//! - bounded retries with exponential backoff
//! - a content guard that stops immediately on anti-bot / captcha pages
//!
//! ```text
//! PACE → ATTEMPT ─┬─ 2xx, guard clear ──────────► body
//!                 ├─ guard hit ─────────────────► Blocked (never retried)
//!                 └─ transport / timeout / non-2xx
//!                        ├─ retries left → BACKOFF → PACE → ATTEMPT
//!                        └─ budget spent ─────────► Exhausted(last error)
//! ```
//!
//! Pacing state belongs to a [`Fetcher`] instance; share one fetcher (it is
//! `Send + Sync`) wherever requests must be spaced against each other.

pub mod backoff;
pub mod error;
pub mod fetcher;
pub mod guard;
pub mod options;
pub mod pacer;
pub mod transport;

pub use error::{AttemptError, FetchError};
pub use fetcher::Fetcher;
pub use guard::{ContentGuard, DEFAULT_BLOCK_MARKERS};
pub use options::FetchOptions;
pub use pacer::{HostPacer, Reservation};
pub use transport::{HttpTransport, RawResponse, Transport};
