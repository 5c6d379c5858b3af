// src/pipeline/summary.rs

//! Daily summary cycle.

use crate::pipeline::Pipeline;

impl Pipeline {
    /// Send the per-source item counts of the stored snapshot.
    ///
    /// Returns whether the summary was delivered; failures are logged and
    /// reported through the error notification.
    pub async fn run_summary_cycle(&self) -> bool {
        let snapshot = self.store.load().await;
        log::info!(
            "Summarizing {} quests across {} sources",
            snapshot.total_items(),
            snapshot.source_count()
        );

        match self.notifier.notify_summary(&snapshot).await {
            Ok(()) => true,
            Err(e) => {
                let message = format!("Error sending daily summary: {e}");
                log::error!("{}", message);
                self.notifier.notify_error(&message).await;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::models::{Config, Item, Snapshot};
    use crate::notify::Notifier;
    use crate::notify::testing::RecordingTransport;
    use crate::services::QuestSource;
    use crate::storage::{LocalStorage, SnapshotStore};

    struct NoSource;

    #[async_trait]
    impl QuestSource for NoSource {
        async fn fetch(&self, _source: &str) -> Vec<Item> {
            Vec::new()
        }
    }

    async fn pipeline_with(
        snapshot: Option<Snapshot>,
        transport: Arc<RecordingTransport>,
    ) -> (TempDir, Pipeline) {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(LocalStorage::new(tmp.path().join("quests.json")));
        if let Some(snapshot) = snapshot {
            store.save(&snapshot).await.unwrap();
        }
        let config = Arc::new(Config::default());
        let notifier = Notifier::new(Arc::clone(&config), transport);
        (tmp, Pipeline::new(config, store, Arc::new(NoSource), notifier))
    }

    #[tokio::test]
    async fn test_summary_counts_per_source() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("alpha", vec![Item::new("x", "X", "u"), Item::new("y", "Y", "u")]);
        snapshot.insert("beta", Vec::new());
        let transport = Arc::new(RecordingTransport::default());
        let (_tmp, pipeline) = pipeline_with(Some(snapshot), transport.clone()).await;

        assert!(pipeline.run_summary_cycle().await);

        let sent = transport.messages();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Total Quests: 2"));
        assert!(sent[0].contains("alpha → 2 quests"));
        assert!(sent[0].contains("beta → 0 quests"));
    }

    #[tokio::test]
    async fn test_summary_without_snapshot() {
        let transport = Arc::new(RecordingTransport::default());
        let (_tmp, pipeline) = pipeline_with(None, transport.clone()).await;

        assert!(pipeline.run_summary_cycle().await);
        assert!(transport.messages()[0].contains("Total Quests: 0"));
    }

    #[tokio::test]
    async fn test_summary_failure_sends_error_report() {
        let transport = Arc::new(RecordingTransport::failing_on("Daily Quest Summary"));
        let (_tmp, pipeline) = pipeline_with(None, transport.clone()).await;

        assert!(!pipeline.run_summary_cycle().await);

        let sent = transport.messages();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Error sending daily summary"));
    }
}
