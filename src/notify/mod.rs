//! Outbound notifications.
//!
//! Messages are delivered one at a time: every send is awaited before the
//! next one starts, so ordering within a cycle is preserved.

pub mod messages;
pub mod telegram;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;

use crate::error::Result;
use crate::models::{Config, Item, Snapshot};

pub use telegram::TelegramTransport;

/// Delivers a formatted message to the configured destination.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

/// Formats pipeline events and hands them to a transport.
#[derive(Clone)]
pub struct Notifier {
    config: Arc<Config>,
    transport: Arc<dyn MessageTransport>,
}

impl Notifier {
    pub fn new(config: Arc<Config>, transport: Arc<dyn MessageTransport>) -> Self {
        Self { config, transport }
    }

    /// Announce a new quest. Returns whether the message was delivered.
    pub async fn notify_new_item(&self, source: &str, item: &Item) -> bool {
        let fallback_url = self.config.fetcher.page_url(source);
        let message = messages::new_item(source, item, &fallback_url);

        log::info!(
            "Attempting to send message to Telegram: {}...",
            preview(&message)
        );
        match self.transport.send(&message).await {
            Ok(()) => {
                log::info!("New quest found: {} ({})", item.title, source);
                true
            }
            Err(e) => {
                log::warn!("Failed to send message for {}: {}", item.title, e);
                false
            }
        }
    }

    /// Send the aggregate summary of `snapshot`.
    pub async fn notify_summary(&self, snapshot: &Snapshot) -> Result<()> {
        let checked_at = Local::now().format("%H:%M");
        let message = messages::summary(snapshot, checked_at);

        log::info!(
            "Attempting to send message to Telegram: {}...",
            preview(&message)
        );
        self.transport.send(&message).await?;
        log::info!("Daily summary sent successfully.");
        Ok(())
    }

    /// Best-effort error report. Delivery failures are only logged.
    pub async fn notify_error(&self, error_message: &str) {
        if let Err(e) = self.transport.send(&messages::error(error_message)).await {
            log::error!("Failed to send error alert: {}", e);
        }
    }
}

/// First 60 characters of a message, for log lines.
fn preview(message: &str) -> &str {
    crate::utils::truncate_chars(message, 60)
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingTransport;
    use super::*;

    fn notifier(transport: Arc<RecordingTransport>) -> Notifier {
        Notifier::new(Arc::new(Config::default()), transport)
    }

    #[tokio::test]
    async fn test_notify_new_item_uses_page_url_fallback() {
        let transport = Arc::new(RecordingTransport::default());
        let item = Item {
            id: Some("7".to_string()),
            title: "Quest".to_string(),
            url: String::new(),
        };

        assert!(notifier(transport.clone()).notify_new_item("alpha", &item).await);
        let sent = transport.messages();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("(https://zealy.io/cw/alpha/questboard)"));
    }

    #[tokio::test]
    async fn test_notify_new_item_failure_is_reported_not_raised() {
        let transport = Arc::new(RecordingTransport::failing_on("Quest"));
        let item = Item::new("7", "Quest", "u");

        assert!(!notifier(transport.clone()).notify_new_item("alpha", &item).await);
        assert!(transport.messages().is_empty());
    }

    #[tokio::test]
    async fn test_notify_summary_propagates_failure() {
        let transport = Arc::new(RecordingTransport::failing_on("Summary"));
        let result = notifier(transport).notify_summary(&Snapshot::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_notify_error_swallows_failure() {
        let transport = Arc::new(RecordingTransport::failing_on("Bot Error"));
        notifier(transport.clone()).notify_error("boom").await;
        assert!(transport.messages().is_empty());
    }

    #[test]
    fn test_preview_is_char_safe() {
        let message = "🚀".repeat(100);
        assert_eq!(preview(&message).chars().count(), 60);
    }
}
