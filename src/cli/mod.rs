//! CLI for mr-reminder

mod run;
pub mod style;

pub use run::run;

use anstream::println;
use async_trait::async_trait;
use clap::Parser;
use mr_reminder::error::Result;
use mr_reminder::notify::Notifier;
use std::path::PathBuf;

/// Remind your team about open GitLab merge requests via Slack
#[derive(Debug, Parser)]
#[command(name = "mr-reminder", version, about)]
pub struct Cli {
    /// Path to the TOML config file (default: $CONFIG_PATH or ./config.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run once and exit, even if a cron schedule is configured
    #[arg(long)]
    pub once: bool,

    /// Print the summary instead of posting it to Slack
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Notifier for `--dry-run`: prints the summary to stdout
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }
}
