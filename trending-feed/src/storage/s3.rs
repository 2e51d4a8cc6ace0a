//! Amazon S3 backed store.

use super::{StateStore, StoragePath, StorageScheme, StoreError};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use tracing::debug;

/// Stores objects in S3 buckets.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    public_read: bool,
}

impl S3Store {
    /// Wraps an existing client.
    pub fn new(client: Client, public_read: bool) -> Self {
        Self {
            client,
            public_read,
        }
    }

    /// Builds a client from the standard AWS environment (credentials chain, region).
    pub async fn from_env(public_read: bool) -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), public_read)
    }

    fn check_scheme(path: &StoragePath) -> Result<(), StoreError> {
        if path.scheme == StorageScheme::S3 {
            Ok(())
        } else {
            Err(StoreError::UnsupportedScheme {
                store: "s3",
                path: path.to_string(),
            })
        }
    }
}

#[async_trait]
impl StateStore for S3Store {
    async fn get(&self, path: &StoragePath) -> Result<Option<Vec<u8>>, StoreError> {
        Self::check_scheme(path)?;

        let response = match self
            .client
            .get_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                if matches!(e.as_service_error(), Some(GetObjectError::NoSuchKey(_))) {
                    debug!(path = %path, "Object not found");
                    return Ok(None);
                }
                return Err(StoreError::read(path, e));
            }
        };

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| StoreError::read(path, e))?;
        Ok(Some(body.into_bytes().to_vec()))
    }

    async fn put(
        &self,
        path: &StoragePath,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        Self::check_scheme(path)?;

        self.client
            .put_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .content_type(content_type)
            .set_acl(self.public_read.then_some(ObjectCannedAcl::PublicRead))
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StoreError::write(path, e))?;

        Ok(())
    }
}
