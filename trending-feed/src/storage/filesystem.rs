//! Local directory store.

use super::{StateStore, StoragePath, StorageScheme, StoreError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores `file://bucket/key` under `<root>/bucket/key`.
#[derive(Debug, Clone)]
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &StoragePath) -> Result<PathBuf, StoreError> {
        if path.scheme != StorageScheme::File {
            return Err(StoreError::UnsupportedScheme {
                store: "file",
                path: path.to_string(),
            });
        }
        if path.bucket == ".." || path.key.split('/').any(|part| part == "..") {
            return Err(StoreError::InvalidPath {
                path: path.to_string(),
                message: "parent directory components are not allowed".to_string(),
            });
        }
        Ok(self.root.join(&path.bucket).join(&path.key))
    }
}

#[async_trait]
impl StateStore for FilesystemStore {
    async fn get(&self, path: &StoragePath) -> Result<Option<Vec<u8>>, StoreError> {
        let file = self.resolve(path)?;
        match tokio::fs::read(&file).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::read(path, e)),
        }
    }

    async fn put(
        &self,
        path: &StoragePath,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StoreError> {
        let file = self.resolve(path)?;
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::write(path, e))?;
        }
        tokio::fs::write(&file, body)
            .await
            .map_err(|e| StoreError::write(path, e))
    }
}
