//! S3-compatible object storage backend.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{ObjectStoreExt, PutPayload};

use crate::config::{CloudCredentials, StorageConfig};

use super::{ObjectStorage, StorageError, StoredObject, VideoKey};

/// Object storage backed by an S3-compatible bucket.
#[derive(Clone)]
pub struct S3VideoStorage {
    store: Arc<dyn object_store::ObjectStore>,
    bucket: String,
}

impl std::fmt::Debug for S3VideoStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3VideoStorage")
            .field("bucket", &self.bucket)
            .field("store", &self.store.to_string())
            .finish()
    }
}

impl S3VideoStorage {
    /// Build a client for the configured bucket with static credentials.
    ///
    /// No request is made here; the client is reused for every upload.
    pub fn new(config: &StorageConfig, credentials: &CloudCredentials) -> Result<Self, StorageError> {
        let store = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_region(&config.region)
            .with_endpoint(&config.endpoint)
            .with_allow_http(config.endpoint.starts_with("http://"))
            .with_access_key_id(&credentials.access_key)
            .with_secret_access_key(&credentials.secret_key)
            .build()
            .map_err(|e| StorageError::Configuration(e.to_string()))?;

        Ok(Self {
            store: Arc::new(store),
            bucket: config.bucket.clone(),
        })
    }

    /// Wrap an existing store (e.g. `object_store::memory::InMemory`).
    pub fn with_store(store: Arc<dyn object_store::ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3VideoStorage {
    fn name(&self) -> &str {
        "s3"
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(&self, key: &VideoKey, data: Bytes) -> Result<StoredObject, StorageError> {
        let size = data.len() as u64;
        let location = Path::from(key.as_str());
        let start = Instant::now();

        self.store
            .put(&location, PutPayload::from(data))
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object upload failed"
                );
                StorageError::UploadFailed {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object upload successful"
        );

        Ok(StoredObject {
            bucket: self.bucket.clone(),
            key: key.clone(),
            size_bytes: size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    #[test]
    fn test_new_builds_without_network() {
        let storage = S3VideoStorage::new(
            &StorageConfig::default(),
            &CloudCredentials {
                access_key: "ak".to_string(),
                secret_key: "sk".to_string(),
            },
        )
        .unwrap();
        assert_eq!(storage.bucket(), "vvot23-tg-video-new");
        assert_eq!(storage.name(), "s3");
    }

    #[tokio::test]
    async fn test_put_object_writes_bytes() {
        let memory = Arc::new(InMemory::new());
        let storage = S3VideoStorage::with_store(memory.clone(), "test-bucket");
        let key = VideoKey::generate("videos", "mp4");

        let stored = storage
            .put_object(&key, Bytes::from_static(b"video-bytes"))
            .await
            .unwrap();
        assert_eq!(stored.key, key);
        assert_eq!(stored.size_bytes, 11);
        assert_eq!(stored.bucket, "test-bucket");

        let fetched = memory
            .get(&Path::from(key.as_str()))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(fetched.as_ref(), b"video-bytes");
    }
}
