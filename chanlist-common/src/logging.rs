//! Tracing subscriber setup shared by chanlist binaries
//!
//! Startup runs in two phases. Config loading happens under a scoped
//! bootstrap subscriber (`RUST_LOG`, else `info`) so its warnings reach the
//! terminal; the global subscriber is then installed from `[logging]`.
//! Output goes to stderr, leaving stdout to command results.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used before the config file has been read
pub const BOOTSTRAP_LEVEL: &str = "info";

/// Run `f` with a temporary subscriber installed on the current thread
///
/// Meant for config loading: events emitted inside `f` are printed even
/// though the global subscriber does not exist yet.
pub fn with_bootstrap_logging<T>(f: impl FnOnce() -> T) -> T {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(BOOTSTRAP_LEVEL));
    tracing::subscriber::with_default(bootstrap_subscriber(filter, std::io::stderr), f)
}

fn bootstrap_subscriber<W>(
    filter: EnvFilter,
    make_writer: W,
) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(make_writer)
        .with_target(false)
        .finish()
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when it is set and parses.
/// Fails if the configured level is not a valid filter directive or a
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            Error::Config(format!("Invalid log level '{}': {}", config.level, e))
        })?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(config.show_target),
        )
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {}", e)))
}
