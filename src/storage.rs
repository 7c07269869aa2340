//! The persisted state is a single named slot holding a serialized blob. The `Storage` trait
//! abstracts that slot so the store can be exercised without touching the disk.

use crate::{utils, Result};
use anyhow::bail;
use std::path::{Path, PathBuf};
use tracing::trace;

/// A single key-value slot. `read` returns `None` when nothing has been written yet.
#[async_trait::async_trait]
pub trait Storage: Send {
    async fn read(&self) -> Result<Option<String>>;
    async fn write(&mut self, blob: &str) -> Result<()>;
}

/// Stores the slot as `<key>.json` inside the data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl Storage for FileStorage {
    async fn read(&self) -> Result<Option<String>> {
        trace!("reading {}", self.path.display());
        if !self.path.is_file() {
            return Ok(None);
        }
        utils::read(&self.path).await.map(Some)
    }

    async fn write(&mut self, blob: &str) -> Result<()> {
        trace!("writing {} bytes to {}", blob.len(), self.path.display());
        utils::write(&self.path, blob).await
    }
}

/// Holds the slot in memory. Writes can be made to fail so that callers can observe how a
/// storage failure is reported.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blob: Option<String>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that already holds `blob`.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
            fail_writes: false,
        }
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn read(&self) -> Result<Option<String>> {
        Ok(self.blob.clone())
    }

    async fn write(&mut self, blob: &str) -> Result<()> {
        if self.fail_writes {
            bail!("Storage quota exceeded");
        }
        self.blob = Some(blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_storage_empty_then_written() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path(), "transactions");
        assert!(storage.read().await.unwrap().is_none());
        storage.write("[]").await.unwrap();
        assert_eq!(storage.read().await.unwrap().as_deref(), Some("[]"));
        assert!(storage.path().ends_with("transactions.json"));
    }

    #[tokio::test]
    async fn test_file_storage_overwrites() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path(), "slot");
        storage.write("[1]").await.unwrap();
        storage.write("[2]").await.unwrap();
        assert_eq!(storage.read().await.unwrap().as_deref(), Some("[2]"));
    }

    #[tokio::test]
    async fn test_memory_storage_failing_writes() {
        let mut storage = MemoryStorage::with_blob("[]");
        storage.set_fail_writes(true);
        assert!(storage.write("[1]").await.is_err());
        assert_eq!(storage.blob(), Some("[]"));
    }
}
