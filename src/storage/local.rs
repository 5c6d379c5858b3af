//! Local filesystem storage implementation.
//!
//! Writes go to a temporary sibling file that is renamed over the snapshot,
//! so a reader never observes a half-written file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Snapshot;
use crate::storage::SnapshotStore;

/// Snapshot stored as a single JSON file.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read and parse the snapshot, surfacing every failure.
    pub async fn try_load(&self) -> Result<Option<Snapshot>> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SnapshotStore for LocalStorage {
    async fn load(&self) -> Snapshot {
        match self.try_load().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                log::info!("No snapshot at {} yet", self.path.display());
                Snapshot::new()
            }
            Err(e) => {
                log::warn!(
                    "Unreadable snapshot at {}: {}. Treating as empty.",
                    self.path.display(),
                    e
                );
                Snapshot::new()
            }
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        self.write_bytes(&bytes).await?;
        log::debug!(
            "Snapshot with {} sources written to {}",
            snapshot.source_count(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            "alpha",
            vec![
                Item::new("1", "Quest A", "https://zealy.io/cw/alpha/questboard"),
                Item {
                    id: None,
                    title: "Anonymous".to_string(),
                    url: String::new(),
                },
            ],
        );
        snapshot.insert("beta", Vec::new());
        snapshot
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("quests.json"));

        let snapshot = sample_snapshot();
        storage.save(&snapshot).await.unwrap();

        assert_eq!(storage.load().await, snapshot);
    }

    #[tokio::test]
    async fn test_load_missing_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("nope.json"));

        assert!(storage.load().await.is_empty());
        assert!(storage.try_load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("quests.json");
        std::fs::write(&path, b"{not json").unwrap();
        let storage = LocalStorage::new(&path);

        assert!(storage.load().await.is_empty());
        assert!(storage.try_load().await.is_err());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs_and_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data/nested/quests.json");
        let storage = LocalStorage::new(&path);

        storage.save(&sample_snapshot()).await.unwrap();

        let mut smaller = Snapshot::new();
        smaller.insert("gamma", vec![Item::new("9", "Quest Z", "u")]);
        storage.save(&smaller).await.unwrap();

        let loaded = storage.load().await;
        assert_eq!(loaded, smaller);
        assert!(!loaded.contains("alpha"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_reads_python_style_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("quests.json");
        std::fs::write(
            &path,
            r#"{
  "alpha": [
    {"id": "1", "title": "Quest A", "url": "u"}
  ]
}"#,
        )
        .unwrap();
        let storage = LocalStorage::new(&path);

        let loaded = storage.load().await;
        assert_eq!(loaded.items("alpha"), &[Item::new("1", "Quest A", "u")]);
    }
}
