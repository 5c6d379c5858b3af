//! Quest item and snapshot data structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A quest detected on a questboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Identifier carried by the quest element; `None` never matches a previous item
    #[serde(default)]
    pub id: Option<String>,

    /// Visible text of the quest, at most 80 characters
    #[serde(default)]
    pub title: String,

    /// Link to the quest or its questboard
    #[serde(default)]
    pub url: String,
}

impl Item {
    /// Create an item with a known identifier.
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: title.into(),
            url: url.into(),
        }
    }

    /// Identifier as a string slice, if present.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Last observed items per tracked source.
///
/// Serialized as a plain JSON object: `{"source": [{id, title, url}, ...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Snapshot {
    sources: BTreeMap<String, Vec<Item>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items recorded for a source (empty if the source was never seen).
    pub fn items(&self, source: &str) -> &[Item] {
        self.sources.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Record the items of a source, replacing whatever was there.
    pub fn insert(&mut self, source: impl Into<String>, items: Vec<Item>) {
        self.sources.insert(source.into(), items);
    }

    pub fn contains(&self, source: &str) -> bool {
        self.sources.contains_key(source)
    }

    /// Iterate sources with their items in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Item])> {
        self.sources
            .iter()
            .map(|(source, items)| (source.as_str(), items.as_slice()))
    }

    /// Number of tracked sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Total number of items across all sources.
    pub fn total_items(&self) -> usize {
        self.sources.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl FromIterator<(String, Vec<Item>)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Item>)>>(iter: I) -> Self {
        Self {
            sources: iter.into_iter().collect(),
        }
    }
}
