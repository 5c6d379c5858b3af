//! Service layer for the notifier.
//!
//! - Questboard fetching (`QuestboardFetcher`, behind the `QuestSource` trait)

mod quests;

pub use quests::{QuestSource, QuestboardFetcher, parse_questboard};
