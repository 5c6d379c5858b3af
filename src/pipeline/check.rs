// src/pipeline/check.rs

//! Quest check cycle.

use crate::error::Result;
use crate::models::Snapshot;
use crate::pipeline::{Pipeline, calculate_diff};

/// Outcome of one check cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub sources_checked: usize,
    pub items_seen: usize,
    pub new_items: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
    /// Whether the new snapshot reached storage
    pub saved: bool,
}

impl Pipeline {
    /// Run fetch → diff → notify for every source, then persist the snapshot.
    ///
    /// Never fails: an error aborting the cycle is logged and reported
    /// through the error notification.
    pub async fn run_check_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        if let Err(e) = self.check_all(&mut report).await {
            let message = format!("Unexpected error in check cycle: {e}");
            log::error!("{}", message);
            self.notifier.notify_error(&message).await;
        }

        report
    }

    async fn check_all(&self, report: &mut CycleReport) -> Result<()> {
        log::info!("Checking for updates...");
        let previous = self.store.load().await;
        let mut current = Snapshot::new();

        for source in &self.config.sources {
            log::info!("Checking {}...", source);
            let items = self.source.fetch(source).await;
            let changes = calculate_diff(previous.items(source), &items);

            if changes.added.is_empty() {
                log::info!("No new quests found for {}.", source);
            }
            for item in &changes.added {
                if self.notifier.notify_new_item(source, item).await {
                    report.notifications_sent += 1;
                } else {
                    report.notifications_failed += 1;
                }
            }
            if changes.has_changes() {
                log::debug!(
                    "{}: {} added, {} no longer listed",
                    source,
                    changes.added.len(),
                    changes.removed.len()
                );
            }

            report.sources_checked += 1;
            report.items_seen += items.len();
            report.new_items += changes.added.len();
            current.insert(source.clone(), items);
        }

        self.store.save(&current).await?;
        report.saved = true;

        log::info!(
            "Check complete: {} sources, {} quests, {} new.",
            report.sources_checked,
            report.items_seen,
            report.new_items
        );
        Ok(())
    }
}
