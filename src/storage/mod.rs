//! Snapshot persistence.
//!
//! The snapshot is the only durable state: one JSON object mapping each
//! tracked source to the items seen on the last completed check.
//!
//! ```text
//! {
//!   "alpha": [{"id": "1", "title": "Quest A", "url": "https://..."}],
//!   "beta": []
//! }
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Snapshot;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the last saved snapshot.
    ///
    /// Never fails: a missing or unreadable snapshot is reported as empty.
    async fn load(&self) -> Snapshot;

    /// Replace the stored snapshot with `snapshot`.
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}
