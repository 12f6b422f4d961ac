//! Mock object storage for testing.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::storage::{ObjectStorage, StorageError, StoredObject, VideoKey};

/// An object written through [`MockObjectStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPut {
    pub key: VideoKey,
    pub data: Bytes,
}

/// Mock implementation of the ObjectStorage trait.
#[derive(Debug, Clone)]
pub struct MockObjectStorage {
    bucket: String,
    puts: Arc<RwLock<Vec<RecordedPut>>>,
    next_error: Arc<RwLock<Option<StorageError>>>,
}

impl Default for MockObjectStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MockObjectStorage {
    pub fn new() -> Self {
        Self {
            bucket: "mock-bucket".to_string(),
            puts: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Get all recorded writes, in order.
    pub async fn puts(&self) -> Vec<RecordedPut> {
        self.puts.read().await.clone()
    }

    pub async fn put_count(&self) -> usize {
        self.puts.read().await.len()
    }

    /// Configure the next write to fail with the given error.
    pub async fn set_next_error(&self, error: StorageError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl ObjectStorage for MockObjectStorage {
    fn name(&self) -> &str {
        "mock"
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(&self, key: &VideoKey, data: Bytes) -> Result<StoredObject, StorageError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let size_bytes = data.len() as u64;
        self.puts.write().await.push(RecordedPut {
            key: key.clone(),
            data,
        });

        Ok(StoredObject {
            bucket: self.bucket.clone(),
            key: key.clone(),
            size_bytes,
        })
    }
}
