//! In-process store, for embedding the runner and for tests.

use super::{StateStore, StoragePath, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// A stored object and its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Raw body.
    pub body: Vec<u8>,
    /// Content type given on write.
    pub content_type: String,
}

/// Keeps objects in memory, keyed by their full path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<StoragePath, StoredObject>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an object.
    pub fn insert(&self, path: StoragePath, body: impl Into<Vec<u8>>, content_type: &str) {
        self.lock().insert(
            path,
            StoredObject {
                body: body.into(),
                content_type: content_type.to_string(),
            },
        );
    }

    /// Returns a copy of an object.
    #[must_use]
    pub fn object(&self, path: &StoragePath) -> Option<StoredObject> {
        self.lock().get(path).cloned()
    }

    /// Returns an object body as text.
    #[must_use]
    pub fn text(&self, path: &StoragePath) -> Option<String> {
        self.object(path)
            .map(|object| String::from_utf8_lossy(&object.body).into_owned())
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<StoragePath, StoredObject>> {
        // A poisoned map is still consistent; every write is a single insert.
        self.objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, path: &StoragePath) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.lock().get(path).map(|object| object.body.clone()))
    }

    async fn put(
        &self,
        path: &StoragePath,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.insert(path.clone(), body, content_type);
        Ok(())
    }
}
