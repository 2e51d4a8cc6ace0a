//! State store adapters.
//!
//! The run keeps three objects per configured path: the seen-set at
//! `<base>`, and the feeds at `<base>.atom` and `<base>.rss`.

mod error;
mod filesystem;
mod memory;
mod path;
mod s3;

pub use error::{BoxError, StoreError};
pub use filesystem::FilesystemStore;
pub use memory::{MemoryStore, StoredObject};
pub use path::{StoragePath, StorageScheme};
pub use s3::S3Store;

use async_trait::async_trait;

/// Content type of the newline-delimited seen-set.
pub const SEEN_SET_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Blob storage addressed by [`StoragePath`].
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Reads an object. A missing object is `Ok(None)`, not an error.
    async fn get(&self, path: &StoragePath) -> Result<Option<Vec<u8>>, StoreError>;

    /// Writes an object, replacing any previous content.
    async fn put(
        &self,
        path: &StoragePath,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError>;
}
