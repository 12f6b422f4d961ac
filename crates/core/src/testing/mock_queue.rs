//! Mock task queue for testing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::queue::{PublishReceipt, QueueError, TaskQueue};
use crate::task::DownloadTask;

/// Mock implementation of the TaskQueue trait.
///
/// Records every published task; failures are injected one at a time.
#[derive(Debug, Clone)]
pub struct MockTaskQueue {
    published: Arc<RwLock<Vec<DownloadTask>>>,
    next_error: Arc<RwLock<Option<QueueError>>>,
}

impl Default for MockTaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTaskQueue {
    pub fn new() -> Self {
        Self {
            published: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Get all published tasks, in order.
    pub async fn published(&self) -> Vec<DownloadTask> {
        self.published.read().await.clone()
    }

    /// Published tasks as wire bodies, ready to feed the downloader.
    pub async fn published_bodies(&self) -> Vec<String> {
        self.published
            .read()
            .await
            .iter()
            .filter_map(|task| task.to_body().ok())
            .collect()
    }

    pub async fn publish_count(&self) -> usize {
        self.published.read().await.len()
    }

    /// Configure the next publish to fail with the given error.
    pub async fn set_next_error(&self, error: QueueError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl TaskQueue for MockTaskQueue {
    fn name(&self) -> &str {
        "mock"
    }

    async fn publish(&self, task: &DownloadTask) -> Result<PublishReceipt, QueueError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let mut published = self.published.write().await;
        published.push(task.clone());
        Ok(PublishReceipt {
            message_id: Some(format!("mock-{}", published.len())),
        })
    }
}
