//! chanlist - channel screening and page fetching from the command line
//!
//! `classify` runs the configured checks against a channel document (JSON)
//! and prints the report. `fetch` retrieves a channel page through the
//! paced, retrying fetcher and prints the body.
//!
//! Exit status: 0 success / admitted, 1 error, 2 rejected by a check,
//! 3 blocked by an anti-bot page.

use anyhow::{bail, Context, Result};
use chanlist_classify::{Document, Screen};
use chanlist_common::config::{load_config, TomlConfig};
use chanlist_common::logging::{init_logging, with_bootstrap_logging};
use chanlist_fetch::{FetchError, Fetcher};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Command-line arguments for chanlist
#[derive(Parser, Debug)]
#[command(name = "chanlist")]
#[command(about = "Screen YouTube channels against exclusion lists")]
#[command(version)]
struct Args {
    /// Config file (defaults to $CHANLIST_CONFIG, then the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run configured checks against a channel document
    Classify {
        /// JSON document with channelInfo.title, channelInfo.description, videos[].title
        #[arg(short, long)]
        document: PathBuf,

        /// Run only the named check
        #[arg(long)]
        check: Option<String>,
    },

    /// Fetch a page through the resilient fetcher
    Fetch {
        /// Page URL
        url: String,

        /// Override the configured retry budget
        #[arg(long)]
        max_retries: Option<u32>,

        /// Write the body to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Config warnings (missing file, fallback to defaults) must be visible
    let config = match with_bootstrap_logging(|| load_config(args.config.as_deref())) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("chanlist: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("chanlist: {}", e);
        return ExitCode::from(1);
    }

    let result = match args.command {
        Command::Classify { document, check } => run_classify(&config, document, check),
        Command::Fetch {
            url,
            max_retries,
            output,
        } => run_fetch(&config, url, max_retries, output).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run_classify(config: &TomlConfig, path: PathBuf, check: Option<String>) -> Result<ExitCode> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read document {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Document {} is not valid JSON", path.display()))?;
    let document = Document::from_json(value);

    let mut screen = Screen::from_config(&config.checks, &config.classifier);
    if let Some(name) = check {
        screen = match screen.only(&name) {
            Some(only) => only,
            None => bail!("No check named '{}' in config", name),
        };
    }
    if screen.is_empty() {
        warn!("No checks configured; every document is admitted");
    }

    let report = screen.run(&document);
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    if report.ok {
        info!(checks = screen.len(), "Document admitted");
        Ok(ExitCode::SUCCESS)
    } else {
        let rejected: Vec<&str> = report.rejected_by().collect();
        info!(rejected_by = ?rejected, "Document rejected");
        Ok(ExitCode::from(2))
    }
}

async fn run_fetch(
    config: &TomlConfig,
    url: String,
    max_retries: Option<u32>,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let fetcher = Fetcher::new(&config.fetcher).context("Failed to build fetcher")?;
    let mut options = fetcher.default_options().clone();
    if let Some(max_retries) = max_retries {
        options = options.with_max_retries(max_retries);
    }

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    match fetcher.fetch_until_cancelled(&url, &options, &cancel).await {
        Ok(body) => {
            match output {
                Some(path) => {
                    std::fs::write(&path, &body)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), bytes = body.len(), "Saved page");
                }
                None => println!("{}", body),
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ FetchError::Blocked { .. }) => {
            error!("{}", e);
            Ok(ExitCode::from(3))
        }
        Err(e) => Err(e.into()),
    }
}
