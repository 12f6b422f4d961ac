//! Types for task queue operations.

use async_trait::async_trait;
use thiserror::Error;

use crate::task::DownloadTask;

/// Errors that can occur while publishing a task.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Failed to encode task: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Queue request throttled")]
    Throttled,

    #[error("Queue request timed out")]
    Timeout,

    #[error("Queue connection error: {0}")]
    Connection(String),

    #[error("Queue service error: {0}")]
    Service(String),
}

impl QueueError {
    /// Classify an SDK error message into the matching variant.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("throttl") || lower.contains("rate exceed") || lower.contains("too many") {
            Self::Throttled
        } else if lower.contains("timeout") || lower.contains("timed out") {
            Self::Timeout
        } else if lower.contains("dispatch failure")
            || lower.contains("connection")
            || lower.contains("dns error")
        {
            Self::Connection(message.to_string())
        } else {
            Self::Service(message.to_string())
        }
    }
}

/// Acknowledgement returned by the queue for a published task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReceipt {
    pub message_id: Option<String>,
}

/// Trait for task queue backends.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Returns the name of this backend.
    fn name(&self) -> &str;

    /// Publish a task descriptor as one queue message.
    async fn publish(&self, task: &DownloadTask) -> Result<PublishReceipt, QueueError>;
}
