//! Local filesystem storage implementation.
//!
//! One JSON file per chart under `{country}/{pricing}/{genre}.json`,
//! plus the aggregated `apps.json` index at the root. All writes are
//! atomic (temp file + rename) so a crashed run never leaves a
//! half-written snapshot behind.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{AppsIndex, ChartEntry, ChartKey};
use crate::pipeline::UpdateSummary;
use crate::storage::ChartStorage;

/// Name of the aggregated index file.
pub const INDEX_FILE: &str = "apps.json";

/// Name of the run summary file.
pub const SUMMARY_FILE: &str = "stats.json";

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ChartStorage for LocalStorage {
    async fn load_chart(&self, key: &ChartKey) -> Result<Vec<ChartEntry>> {
        Ok(self
            .read_json(&key.storage_key())
            .await?
            .unwrap_or_default())
    }

    async fn write_chart(&self, key: &ChartKey, entries: &[ChartEntry]) -> Result<()> {
        self.write_json(&key.storage_key(), entries).await
    }

    async fn ensure_chart(&self, key: &ChartKey) -> Result<()> {
        let storage_key = key.storage_key();
        if tokio::fs::try_exists(self.path(&storage_key)).await? {
            return Ok(());
        }
        self.write_json::<[ChartEntry]>(&storage_key, &[]).await
    }

    async fn load_index(&self) -> Result<Option<AppsIndex>> {
        self.read_json(INDEX_FILE).await
    }

    async fn write_index(&self, index: &AppsIndex) -> Result<()> {
        self.write_json(INDEX_FILE, index).await
    }

    async fn write_summary(&self, summary: &UpdateSummary) -> Result<()> {
        self.write_json(SUMMARY_FILE, summary).await
    }
}
