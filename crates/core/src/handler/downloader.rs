//! Downloader: download tasks in, stored videos and reply links out.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{Config, PublicUrlConfig};
use crate::event::{QueueEvent, QueueMessage};
use crate::metrics::{BATCH_FAILURES, DOWNLOAD_TASKS_TOTAL, HANDLER_DURATION, UPLOADED_BYTES};
use crate::storage::{ObjectStorage, StorageError, VideoKey};
use crate::task::{DownloadTask, RawTask, TaskError};
use crate::telegram::{BotApi, FileLookup, TelegramError};

use super::types::{decode_event, notify, HandlerResponse, Notice};

/// Unexpected failures while handling one download task.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("queue message has no body")]
    MissingBody,

    #[error("task body is not valid JSON")]
    InvalidTask(#[source] serde_json::Error),

    #[error("file lookup for {file_id} returned no file_path")]
    MissingFilePath { file_id: String },

    #[error("bot API call failed")]
    Telegram(#[from] TelegramError),

    #[error("object upload failed")]
    Storage(#[from] StorageError),
}

/// A failed message, with the chat to apologise to when it was known.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct MessageFailure {
    pub chat_id: Option<i64>,
    #[source]
    pub error: DownloadError,
}

impl MessageFailure {
    fn new(chat_id: Option<i64>, error: DownloadError) -> Self {
        Self { chat_id, error }
    }
}

/// How a download task ended, when it did not fail unexpectedly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Descriptor incomplete; nothing was done and nobody was told.
    Skipped(TaskError),
    /// `getFile` answered `ok: false`; the user was told.
    MetadataUnavailable,
    /// The file endpoint answered a non-200 status; the user was told.
    DownloadFailed { status: u16 },
    /// Stored and linked.
    Delivered { key: VideoKey, url: String },
}

impl DownloadOutcome {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            DownloadOutcome::Skipped(_) => "skipped",
            DownloadOutcome::MetadataUnavailable => "metadata_unavailable",
            DownloadOutcome::DownloadFailed { .. } => "download_failed",
            DownloadOutcome::Delivered { .. } => "delivered",
        }
    }
}

/// Per-batch tally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloaderReport {
    pub delivered: usize,
    pub skipped: usize,
    pub metadata_unavailable: usize,
    pub download_failed: usize,
    pub errors: usize,
}

impl DownloaderReport {
    fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Skipped(_) => self.skipped += 1,
            DownloadOutcome::MetadataUnavailable => self.metadata_unavailable += 1,
            DownloadOutcome::DownloadFailed { .. } => self.download_failed += 1,
            DownloadOutcome::Delivered { .. } => self.delivered += 1,
        }
    }
}

/// Storage key layout and public URL shape.
#[derive(Debug, Clone)]
pub struct DownloaderSettings {
    pub key_prefix: String,
    pub extension: String,
    pub public: PublicUrlConfig,
}

impl DownloaderSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            key_prefix: config.storage.key_prefix.clone(),
            extension: config.storage.extension.clone(),
            public: config.public.clone(),
        }
    }
}

/// Fetches queued videos from the bot platform and republishes them to
/// object storage.
pub struct Downloader {
    bot: Arc<dyn BotApi>,
    storage: Arc<dyn ObjectStorage>,
    settings: DownloaderSettings,
}

impl Downloader {
    pub fn new(
        bot: Arc<dyn BotApi>,
        storage: Arc<dyn ObjectStorage>,
        settings: DownloaderSettings,
    ) -> Self {
        Self {
            bot,
            storage,
            settings,
        }
    }

    /// Handle a raw trigger payload (object or JSON string).
    pub async fn handle_value(&self, payload: Value) -> HandlerResponse {
        match decode_event("downloader", payload) {
            Some(event) => self.handle(&event).await,
            None => HandlerResponse::ok(),
        }
    }

    /// Handle a decoded trigger event. Always answers 200.
    pub async fn handle(&self, event: &QueueEvent) -> HandlerResponse {
        let timer = HANDLER_DURATION
            .with_label_values(&["downloader"])
            .start_timer();
        info!(messages = event.len(), "Downloader invoked");

        let report = self.process(event).await;
        info!(
            delivered = report.delivered,
            skipped = report.skipped,
            metadata_unavailable = report.metadata_unavailable,
            download_failed = report.download_failed,
            errors = report.errors,
            "Downloader batch complete"
        );

        timer.observe_duration();
        HandlerResponse::ok()
    }

    /// Process the batch in delivery order. A failing message never stops the
    /// batch; its chat (if known) gets a generic error notice.
    pub async fn process(&self, event: &QueueEvent) -> DownloaderReport {
        let mut report = DownloaderReport::default();

        for (index, message) in event.messages.iter().enumerate() {
            match self.process_message(message).await {
                Ok(outcome) => {
                    DOWNLOAD_TASKS_TOTAL
                        .with_label_values(&[outcome.label()])
                        .inc();
                    report.record(&outcome);
                }
                Err(failure) => {
                    DOWNLOAD_TASKS_TOTAL.with_label_values(&["error"]).inc();
                    BATCH_FAILURES.with_label_values(&["downloader"]).inc();
                    report.errors += 1;
                    error!(
                        index,
                        chat_id = ?failure.chat_id,
                        error = ?failure.error,
                        "Error processing download task"
                    );

                    if let Some(chat_id) = failure.chat_id {
                        if let Err(e) =
                            notify(self.bot.as_ref(), chat_id, Notice::ProcessingError).await
                        {
                            error!(chat_id, error = %e, "Failed to send error notification");
                        }
                    }
                }
            }
        }

        report
    }

    /// Handle one queue message.
    pub async fn process_message(
        &self,
        message: &QueueMessage,
    ) -> Result<DownloadOutcome, MessageFailure> {
        let body = message
            .body()
            .ok_or_else(|| MessageFailure::new(None, DownloadError::MissingBody))?;
        let raw = RawTask::parse(body)
            .map_err(|e| MessageFailure::new(None, DownloadError::InvalidTask(e)))?;

        let task = match raw.validate() {
            Ok(task) => task,
            Err(e) => {
                warn!(error = %e, "Task missing file_id or chat_id, skipping");
                return Ok(DownloadOutcome::Skipped(e));
            }
        };

        self.deliver(&task)
            .await
            .map_err(|error| MessageFailure::new(Some(task.chat_id), error))
    }

    async fn deliver(&self, task: &DownloadTask) -> Result<DownloadOutcome, DownloadError> {
        let chat_id = task.chat_id;
        info!(chat_id, file_id = %task.file_id, "Processing download task");

        let info = match self.bot.get_file(&task.file_id).await? {
            FileLookup::Found(info) => info,
            FileLookup::Unavailable { description } => {
                error!(
                    chat_id,
                    file_id = %task.file_id,
                    description = description.as_deref().unwrap_or(""),
                    "Failed to get file info"
                );
                notify(self.bot.as_ref(), chat_id, Notice::FetchFailed).await?;
                return Ok(DownloadOutcome::MetadataUnavailable);
            }
        };

        let file_path = info
            .file_path
            .filter(|path| !path.is_empty())
            .ok_or_else(|| DownloadError::MissingFilePath {
                file_id: task.file_id.clone(),
            })?;

        let download = self.bot.download_file(&file_path).await?;
        if !download.is_success() {
            error!(chat_id, status = download.status, "Failed to download video");
            notify(self.bot.as_ref(), chat_id, Notice::DownloadFailed).await?;
            return Ok(DownloadOutcome::DownloadFailed {
                status: download.status,
            });
        }

        let key = VideoKey::generate(&self.settings.key_prefix, &self.settings.extension);
        let stored = self.storage.put_object(&key, download.bytes).await?;
        UPLOADED_BYTES.inc_by(stored.size_bytes);
        info!(
            chat_id,
            bucket = %stored.bucket,
            key = %key,
            size_bytes = stored.size_bytes,
            "Uploaded video"
        );

        let url = self.settings.public.url_for(key.as_str());
        notify(self.bot.as_ref(), chat_id, Notice::Delivered { url: &url }).await?;

        Ok(DownloadOutcome::Delivered { key, url })
    }
}
