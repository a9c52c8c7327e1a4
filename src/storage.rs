//! Object storage collaborator
//!
//! Profile images go through this seam. The rest of the system treats the
//! store as an opaque put/delete dependency; the bundled implementation
//! writes to a local directory.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a successful store: the key to persist and the public URL
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under a fresh key derived from the original extension
    async fn put(&self, extension: &str, bytes: &[u8]) -> Result<StoredObject, StorageError>;

    /// Delete a previously stored object; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Local-disk implementation used in development and tests
pub struct LocalDiskStore {
    root: PathBuf,
}

impl LocalDiskStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl ObjectStore for LocalDiskStore {
    async fn put(&self, extension: &str, bytes: &[u8]) -> Result<StoredObject, StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let key = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.root.join(&key);
        tokio::fs::write(&path, bytes).await?;
        Ok(StoredObject {
            url: format!("/uploads/{}", key),
            key,
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.root.join(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_delete() {
        let root = std::env::temp_dir().join(format!("placedesk-store-{}", Uuid::new_v4()));
        let store = LocalDiskStore::new(root.clone());

        let stored = store.put("png", b"not-really-a-png").await.unwrap();
        assert!(stored.key.ends_with(".png"));
        assert!(stored.url.starts_with("/uploads/"));
        assert!(root.join(&stored.key).exists());

        store.delete(&stored.key).await.unwrap();
        assert!(!root.join(&stored.key).exists());

        // Deleting again is fine
        store.delete(&stored.key).await.unwrap();

        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
