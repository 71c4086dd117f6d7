//! Run command - one-shot or scheduled reminders

use crate::cli::style::{Stylize, check};
use crate::cli::{Cli, StdoutNotifier};
use anstream::println;
use mr_reminder::config::{self, Config, LoadOptions, OsEnv};
use mr_reminder::error::{Error, Result};
use mr_reminder::gitlab::GitLabService;
use mr_reminder::notify::{Notifier, SlackWebhook};
use mr_reminder::run::{Outcome, execute};
use mr_reminder::schedule::run_scheduled;
use tracing::{info, warn};

/// Load configuration and run in the mode it asks for
pub async fn run(cli: &Cli) -> Result<()> {
    let options = LoadOptions {
        path: cli.config.clone(),
        dry_run: cli.dry_run,
    };
    let config = config::load(&OsEnv, &options)?;

    let client = GitLabService::new(&config.gitlab_url, config.gitlab_token.clone())?;
    let notifier = create_notifier(&config, cli.dry_run)?;

    match &config.schedule {
        Some(schedule) if !cli.once => {
            info!(schedule = %schedule, timezone = %config.timezone, "running in cron mode");

            let config = &config;
            let client = &client;
            let notifier = notifier.as_ref();
            run_scheduled(schedule, config.timezone, shutdown_signal(), move || async move {
                execute(config, client, notifier).await.map(|_| ())
            })
            .await
        }
        _ => {
            info!("running in one-shot mode");
            let outcome = execute(&config, &client, notifier.as_ref()).await?;
            report(outcome, cli.dry_run);
            Ok(())
        }
    }
}

fn create_notifier(config: &Config, dry_run: bool) -> Result<Box<dyn Notifier>> {
    if dry_run {
        return Ok(Box::new(StdoutNotifier));
    }

    let webhook_url = config
        .webhook_url
        .clone()
        .ok_or_else(|| Error::Config("SLACK_WEBHOOK_URL environment variable is required".to_string()))?;
    Ok(Box::new(SlackWebhook::new(webhook_url)?))
}

fn report(outcome: Outcome, dry_run: bool) {
    match outcome {
        Outcome::Sent { count } if dry_run => {
            println!(
                "{}",
                format!("Dry run: {count} merge request(s), nothing posted").muted()
            );
        }
        Outcome::Sent { count } => {
            println!(
                "{} {} of {} merge request(s) to Slack",
                check(),
                "Sent summary".emphasis(),
                count.accent()
            );
        }
        Outcome::NothingToSend => {
            println!("{}", "No opened merge requests found".muted());
        }
    }
}

/// Resolves on Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
