//! Slack incoming-webhook notifier

use crate::error::{Error, Result};
use crate::notify::Notifier;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Posts messages to a Slack incoming webhook
pub struct SlackWebhook {
    client: Client,
    webhook_url: String,
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    text: &'a str,
}

impl SlackWebhook {
    /// Create a notifier for `webhook_url`
    pub fn new(webhook_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Webhook(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            webhook_url,
        })
    }
}

#[async_trait]
impl Notifier for SlackWebhook {
    async fn send(&self, text: &str) -> Result<()> {
        debug!(len = text.len(), "posting to Slack webhook");

        self.client
            .post(&self.webhook_url)
            .json(&WebhookMessage { text })
            .send()
            .await
            .map_err(|e| Error::Webhook(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Webhook(e.to_string()))?;

        debug!("posted to Slack webhook");
        Ok(())
    }
}
