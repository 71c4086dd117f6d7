//! Summary delivery
//!
//! Delivery is behind [`Notifier`] so runs can be exercised without
//! posting anywhere.

mod slack;

pub use slack::SlackWebhook;

use crate::error::Result;
use async_trait::async_trait;

/// Destination for a rendered summary
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text`
    async fn send(&self, text: &str) -> Result<()>;
}
