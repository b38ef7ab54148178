use aether_types::{LedgerError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// File name of the persisted proof snapshot inside the data directory. One
/// fixed namespace; the whole store serializes into it on every mutation.
pub const SNAPSHOT_FILE: &str = "aether_proofs.json";

/// Durable home for the serialized proof list.
///
/// `read` distinguishes "nothing persisted yet" (`Ok(None)`) from an actual
/// I/O failure; the store treats both, and any parse failure, as "no data".
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn read(&self) -> Result<Option<String>>;
    async fn write(&self, payload: &str) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// In-memory backend for tests and ephemeral sessions.
pub struct MemorySnapshots {
    slot: RwLock<Option<String>>,
}

impl Default for MemorySnapshots {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySnapshots {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshots {
    async fn read(&self) -> Result<Option<String>> {
        Ok(self.slot.read().await.clone())
    }

    async fn write(&self, payload: &str) -> Result<()> {
        *self.slot.write().await = Some(payload.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.write().await = None;
        Ok(())
    }
}

/// Single-JSON-file backend under the node's data directory.
pub struct FileSnapshots {
    path: PathBuf,
}

impl FileSnapshots {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SNAPSHOT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshots {
    async fn read(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LedgerError::Snapshot(e.to_string())),
        }
    }

    async fn write(&self, payload: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LedgerError::Snapshot(e.to_string()))?;
        }
        tokio::fs::write(&self.path, payload)
            .await
            .map_err(|e| LedgerError::Snapshot(e.to_string()))
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LedgerError::Snapshot(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_round_trip() {
        let store = MemorySnapshots::new();
        assert_eq!(store.read().await.unwrap(), None);

        store.write("[1,2,3]").await.unwrap();
        assert_eq!(store.read().await.unwrap().as_deref(), Some("[1,2,3]"));

        store.clear().await.unwrap();
        assert_eq!(store.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshots::new(dir.path());

        assert_eq!(store.read().await.unwrap(), None);

        store.write("[]").await.unwrap();
        assert_eq!(store.read().await.unwrap().as_deref(), Some("[]"));
        assert!(store.path().exists());

        store.clear().await.unwrap();
        assert_eq!(store.read().await.unwrap(), None);
        // Clearing twice is fine.
        store.clear().await.unwrap();
    }
}
