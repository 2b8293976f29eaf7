//! Configuration loading and config file resolution
//!
//! Config file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `CHANLIST_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/chanlist/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing config file is not fatal: a warning is logged and compiled
//! defaults are used. A file that exists but does not parse is an error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "CHANLIST_CONFIG";

/// User-Agent sent by the fetcher unless configured otherwise
pub const DEFAULT_USER_AGENT: &str =
    "chanlist/0.1.0 (+https://github.com/chanlist/chanlist)";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Resilient fetcher settings
    pub fetcher: FetcherSettings,
    /// Classification engine settings shared by all checks
    pub classifier: ClassifierSettings,
    /// Named checks run by the screen
    pub checks: Vec<CheckSpec>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (e.g. "info", "chanlist_fetch=debug")
    pub level: String,
    /// Include the event target in formatted output
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_target: false,
        }
    }
}

/// Fetcher pacing, retry and content guard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherSettings {
    /// Minimum spacing between dispatches to one host
    pub min_interval_ms: u64,
    /// Upper bound of the uniform random delay added to every pacing wait
    pub jitter_ms: u64,
    /// Per-attempt time budget
    pub timeout_ms: u64,
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// First backoff delay
    pub backoff_base_ms: u64,
    /// Backoff ceiling
    pub backoff_cap_ms: u64,
    /// Number of leading body bytes inspected by the content guard
    pub guard_scan_bytes: usize,
    /// User-Agent header value
    pub user_agent: String,
    /// Replaces the built-in block marker list when present
    pub block_markers: Option<Vec<String>>,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            min_interval_ms: 1000,
            jitter_ms: 250,
            timeout_ms: 15_000,
            max_retries: 2,
            backoff_base_ms: 500,
            backoff_cap_ms: 8_000,
            guard_scan_bytes: 64 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            block_markers: None,
        }
    }
}

/// Evidence settings shared by every check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    /// Evidence excerpts kept per field per key
    pub max_samples_per_field: usize,
    /// Characters of context kept on each side of a match
    pub sample_window: usize,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            max_samples_per_field: 3,
            sample_window: 40,
        }
    }
}

/// Which matching strategy a configured check uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckVariant {
    /// Case-insensitive substring matching, per-document threshold
    #[default]
    Phrase,
    /// Case-insensitive whole-word matching, per-document threshold
    Word,
    /// Distinct flagged characters, per-field limit
    CharSet,
}

/// One named check as written in `[[checks]]`
///
/// `keys` and `threshold` are decoded leniently: a `keys` value that is not
/// a list becomes an empty list, non-string entries are dropped, and a
/// non-numeric threshold becomes 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckSpec {
    /// Name reported alongside the verdict
    pub name: String,
    /// Matching strategy
    #[serde(default)]
    pub variant: CheckVariant,
    /// Raw threshold; coerced to a non-negative integer by the engine
    #[serde(default, deserialize_with = "lenient::number")]
    pub threshold: f64,
    /// Raw keys (phrases, words, or characters)
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub keys: Vec<String>,
}

mod lenient {
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListRepr {
        Items(Vec<ItemRepr>),
        Other(IgnoredAny),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ItemRepr {
        Text(String),
        Other(IgnoredAny),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberRepr {
        Int(i64),
        Float(f64),
        Other(IgnoredAny),
    }

    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match ListRepr::deserialize(deserializer)? {
            ListRepr::Items(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    ItemRepr::Text(text) => Some(text),
                    ItemRepr::Other(_) => None,
                })
                .collect(),
            ListRepr::Other(_) => Vec::new(),
        })
    }

    pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match NumberRepr::deserialize(deserializer)? {
            NumberRepr::Int(n) => n as f64,
            NumberRepr::Float(n) => n,
            NumberRepr::Other(_) => 0.0,
        })
    }
}

/// Resolve which config file to read, if any
///
/// Returns `None` when neither an explicit path nor a platform config file
/// exists. Explicit paths (CLI or env) are returned even when missing so the
/// caller can report them.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().filter(|path| path.exists())
}

/// Platform config file location (`~/.config/chanlist/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chanlist").join("config.toml"))
}

/// Load configuration with graceful degradation
///
/// Missing files fall back to compiled defaults with a warning; parse
/// failures are reported as [`Error::Config`].
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = resolve_config_path(cli_arg) else {
        info!("No config file found, using compiled defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(
            "Config file {} does not exist, using compiled defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let config = load_toml_config(&path)?;
    info!(path = %path.display(), checks = config.checks.len(), "Loaded config file");
    Ok(config)
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Parse TOML config text
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
}

/// Write a config file, creating parent directories as needed
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}
