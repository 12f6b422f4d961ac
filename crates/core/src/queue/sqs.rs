//! SQS-compatible queue publisher.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sqs::config::Credentials;
use aws_sdk_sqs::error::DisplayErrorContext;
use tracing::{debug, error, info};

use crate::config::{CloudCredentials, QueueConfig};
use crate::task::DownloadTask;

use super::{PublishReceipt, QueueError, TaskQueue};

/// Publishes download tasks to an SQS-compatible queue.
pub struct SqsTaskQueue {
    client: aws_sdk_sqs::Client,
    queue_url: String,
}

impl std::fmt::Debug for SqsTaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqsTaskQueue")
            .field("queue_url", &self.queue_url)
            .field("client", &"<SqsClient>")
            .finish()
    }
}

impl SqsTaskQueue {
    /// Build a publisher with static credentials against the configured endpoint.
    pub async fn new(config: &QueueConfig, credentials: &CloudCredentials) -> Self {
        debug!(endpoint = %config.endpoint, region = %config.region, "Building queue client");

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(Credentials::new(
                credentials.access_key.clone(),
                credentials.secret_key.clone(),
                None,
                None,
                "vidrelay-static",
            ))
            .load()
            .await;

        Self {
            client: aws_sdk_sqs::Client::new(&sdk_config),
            queue_url: config.url.clone(),
        }
    }
}

#[async_trait]
impl TaskQueue for SqsTaskQueue {
    fn name(&self) -> &str {
        "sqs"
    }

    async fn publish(&self, task: &DownloadTask) -> Result<PublishReceipt, QueueError> {
        let body = task.to_body()?;

        let result = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                error!(error = %message, queue_url = %self.queue_url, "Queue send_message failed");
                QueueError::classify(&message)
            })?;

        let message_id = result.message_id().map(str::to_owned);
        info!(
            message_id = message_id.as_deref().unwrap_or("unknown"),
            chat_id = task.chat_id,
            "Download task published"
        );

        Ok(PublishReceipt { message_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    const QUEUE_PATH: &str = "/b1g/dj6/downloader";

    async fn queue_for(server: &Server) -> SqsTaskQueue {
        let config = QueueConfig {
            url: format!("{}{}", server.url(), QUEUE_PATH),
            endpoint: server.url(),
            region: "ru-central1".to_string(),
        };
        let credentials = CloudCredentials {
            access_key: "test-access-key".to_string(),
            secret_key: "test-secret-key".to_string(),
        };
        SqsTaskQueue::new(&config, &credentials).await
    }

    #[tokio::test]
    async fn test_publish_sends_task_body() {
        let mut server = Server::new_async().await;
        let queue_url = format!("{}{}", server.url(), QUEUE_PATH);
        let mock = server
            .mock("POST", "/")
            .match_header("x-amz-target", "AmazonSQS.SendMessage")
            .match_body(Matcher::PartialJson(json!({
                "QueueUrl": queue_url,
                "MessageBody": r#"{"file_id":"abc","chat_id":42}"#,
            })))
            .with_status(200)
            .with_header("content-type", "application/x-amz-json-1.0")
            .with_body(
                r#"{"MessageId":"msg-1","MD5OfMessageBody":"0f6ffe6134dc13be4e286a3ca0fb4e28"}"#,
            )
            .create_async()
            .await;

        let queue = queue_for(&server).await;
        let receipt = queue.publish(&DownloadTask::new("abc", 42)).await.unwrap();

        assert_eq!(receipt.message_id.as_deref(), Some("msg-1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_publish_missing_queue_is_service_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(400)
            .with_header("content-type", "application/x-amz-json-1.0")
            .with_body(
                r#"{"__type":"com.amazonaws.sqs#QueueDoesNotExist","message":"The specified queue does not exist."}"#,
            )
            .create_async()
            .await;

        let queue = queue_for(&server).await;
        let err = queue
            .publish(&DownloadTask::new("abc", 42))
            .await
            .unwrap_err();

        assert!(matches!(err, QueueError::Service(_)), "unexpected: {:?}", err);
    }
}
