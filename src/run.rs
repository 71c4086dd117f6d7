//! A single reminder run
//!
//! Aggregates, filters and renders the digest, then hands it to the
//! notifier. An empty digest is a successful run that sends nothing.

use crate::config::Config;
use crate::digest::{aggregate, filter_by_author, render_summary};
use crate::error::Result;
use crate::gitlab::CollectionClient;
use crate::notify::Notifier;
use tracing::info;

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A summary of `count` merge requests was delivered
    Sent {
        /// Number of merge requests in the summary
        count: usize,
    },
    /// No merge request matched; nothing was delivered
    NothingToSend,
}

/// Execute one run against `client`, delivering through `notifier`
pub async fn execute(
    config: &Config,
    client: &dyn CollectionClient,
    notifier: &dyn Notifier,
) -> Result<Outcome> {
    let mrs = aggregate(client, &config.groups, &config.projects).await?;
    let fetched = mrs.len();

    let mrs = filter_by_author(mrs, &config.authors);
    info!(fetched, kept = mrs.len(), "collected open merge requests");

    let Some(summary) = render_summary(&mrs, config.timezone) else {
        info!("no opened merge requests found");
        return Ok(Outcome::NothingToSend);
    };

    notifier.send(&summary).await?;
    info!(count = mrs.len(), "sent merge request summary");

    Ok(Outcome::Sent { count: mrs.len() })
}
