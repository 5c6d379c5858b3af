//! Check and summary cycles.
//!
//! - `run_check_cycle`: fetch → diff → notify → persist for every source
//! - `run_summary_cycle`: report item counts of the stored snapshot

pub mod check;
pub mod diff;
pub mod summary;

use std::sync::Arc;

use crate::models::Config;
use crate::notify::Notifier;
use crate::services::QuestSource;
use crate::storage::SnapshotStore;

pub use check::CycleReport;
pub use diff::{DiffResult, calculate_diff, diff};

/// Everything a cycle needs, wired once at startup.
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<Config>,
    store: Arc<dyn SnapshotStore>,
    source: Arc<dyn QuestSource>,
    notifier: Notifier,
}

impl Pipeline {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn SnapshotStore>,
        source: Arc<dyn QuestSource>,
        notifier: Notifier,
    ) -> Self {
        Self {
            config,
            store,
            source,
            notifier,
        }
    }
}
