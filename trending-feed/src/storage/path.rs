//! Storage paths of the form `scheme://bucket/key`.

use super::StoreError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Backend a storage path is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageScheme {
    /// Amazon S3.
    #[default]
    S3,
    /// Local directory tree.
    File,
}

impl StorageScheme {
    /// URL scheme prefix, without `://`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S3 => "s3",
            Self::File => "file",
        }
    }
}

impl fmt::Display for StorageScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s3" => Ok(Self::S3),
            "file" => Ok(Self::File),
            other => Err(format!("unknown storage scheme '{other}'")),
        }
    }
}

/// A fully qualified object location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoragePath {
    /// Backend.
    pub scheme: StorageScheme,
    /// Bucket (or top-level directory for the `file` scheme).
    pub bucket: String,
    /// Object key inside the bucket, without a leading slash.
    pub key: String,
}

impl StoragePath {
    /// Creates a path from its parts.
    pub fn new(scheme: StorageScheme, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            scheme,
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parses `scheme://bucket/key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] when the scheme is missing or
    /// unknown, or the bucket or key is empty.
    pub fn parse(path: &str) -> Result<Self, StoreError> {
        let invalid = |message: String| StoreError::InvalidPath {
            path: path.to_string(),
            message,
        };

        let (scheme, rest) = path
            .split_once("://")
            .ok_or_else(|| invalid("missing '://'".to_string()))?;
        let scheme = scheme.parse::<StorageScheme>().map_err(invalid)?;

        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(invalid("empty bucket".to_string()));
        }
        if key.is_empty() {
            return Err(invalid("empty key".to_string()));
        }

        Ok(Self::new(scheme, bucket, key))
    }

    /// Returns the same location with `suffix` appended to the key.
    #[must_use]
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self::new(self.scheme, self.bucket.clone(), format!("{}{suffix}", self.key))
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.key)
    }
}

impl FromStr for StoragePath {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
