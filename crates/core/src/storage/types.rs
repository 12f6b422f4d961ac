//! Types for object storage operations.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage configuration error: {0}")]
    Configuration(String),

    #[error("Upload of {key} failed: {reason}")]
    UploadFailed { key: String, reason: String },
}

/// Storage key of a relayed video, `<prefix>/<uuid v4>.<extension>`.
///
/// Keys are never reused: every call to [`VideoKey::generate`] yields a fresh
/// UUID, so redelivered tasks produce distinct objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoKey(String);

impl VideoKey {
    pub fn generate(prefix: &str, extension: &str) -> Self {
        let id = Uuid::new_v4();
        let extension = extension.trim_start_matches('.');
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            Self(format!("{}.{}", id, extension))
        } else {
            Self(format!("{}/{}.{}", prefix, id, extension))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: VideoKey,
    pub size_bytes: u64,
}

/// Trait for object storage backends.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Returns the name of this backend.
    fn name(&self) -> &str;

    /// Bucket objects are written to.
    fn bucket(&self) -> &str;

    /// Write `data` under `key`.
    async fn put_object(&self, key: &VideoKey, data: Bytes) -> Result<StoredObject, StorageError>;
}
