//! File-backed key-value store.
//!
//! Each key maps to `<root>/<percent-encoded key>.json`. Writes land in a
//! temporary sibling file first and are renamed into place, so a reader
//! never sees a half-written cart.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::KeyValueStore;
use crate::error::StorageError;

/// A [`KeyValueStore`] that keeps one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory values are stored in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", urlencoding::encode(key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(path = %path.display(), "Wrote store file");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_percent_encoded() {
        let store = FileStore::new("/data");
        assert_eq!(
            store.path_for("@GoMarketplace"),
            PathBuf::from("/data/%40GoMarketplace.json")
        );
        assert_eq!(
            store.path_for("../escape"),
            PathBuf::from("/data/..%2Fescape.json")
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert!(store.get_item("@GoMarketplace").await.unwrap().is_none());
        store.remove_item("@GoMarketplace").await.unwrap();
    }

    #[tokio::test]
    async fn test_write_overwrites_and_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.set_item("@GoMarketplace", "[1]".to_string()).await.unwrap();
        store.set_item("@GoMarketplace", "[2]".to_string()).await.unwrap();

        assert_eq!(
            store.get_item("@GoMarketplace").await.unwrap().as_deref(),
            Some("[2]")
        );
        assert!(!store.path_for("@GoMarketplace").with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_remove_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set_item("cart", "[]".to_string()).await.unwrap();
        store.remove_item("cart").await.unwrap();

        assert!(!store.path_for("cart").exists());
    }
}
