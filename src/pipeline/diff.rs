//! Diff calculation between the previous and current quest lists.
//!
//! Only additions trigger notifications; removals are reported for logging.

use std::collections::HashSet;

use crate::models::Item;

/// Changes of one source between two checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Items not seen before, in current order
    pub added: Vec<Item>,
    /// Ids that were present before and are gone now
    pub removed: Vec<String>,
}

impl DiffResult {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Items of `current` whose id does not appear in `previous`.
///
/// Order follows `current`. Items without an id are always new.
pub fn diff(previous: &[Item], current: &[Item]) -> Vec<Item> {
    let seen: HashSet<&str> = previous.iter().filter_map(Item::id).collect();

    current
        .iter()
        .filter(|item| item.id().is_none_or(|id| !seen.contains(id)))
        .cloned()
        .collect()
}

/// Full diff, including removed ids.
pub fn calculate_diff(previous: &[Item], current: &[Item]) -> DiffResult {
    let current_ids: HashSet<&str> = current.iter().filter_map(Item::id).collect();

    let mut removed = Vec::new();
    let mut reported = HashSet::new();
    for id in previous.iter().filter_map(Item::id) {
        if !current_ids.contains(id) && reported.insert(id) {
            removed.push(id.to_string());
        }
    }

    DiffResult {
        added: diff(previous, current),
        removed,
    }
}
