//! Receiver: chat updates in, download tasks out.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::event::QueueEvent;
use crate::metrics::{BATCH_FAILURES, HANDLER_DURATION, TASKS_PUBLISHED, UPDATES_TOTAL};
use crate::queue::{QueueError, TaskQueue};
use crate::task::DownloadTask;
use crate::telegram::{BotApi, TelegramError, Update};

use super::types::{decode_event, notify, HandlerResponse, Notice};

/// Errors that abort a receiver batch. `index` is the position of the
/// offending message; later messages are not processed.
#[derive(Debug, Error)]
pub enum ReceiverError {
    #[error("message {index}: update body is not valid JSON")]
    InvalidUpdate {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("message {index}: update is missing {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("message {index}: bot API call failed")]
    Telegram {
        index: usize,
        #[source]
        source: TelegramError,
    },

    #[error("message {index}: publishing download task failed")]
    Queue {
        index: usize,
        #[source]
        source: QueueError,
    },
}

/// What a completed receiver batch did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiverReport {
    /// Videos acknowledged and queued.
    pub videos_accepted: usize,
    /// Non-video messages answered with a rejection.
    pub rejected: usize,
    /// Messages without a body or without a chat message.
    pub ignored: usize,
}

/// Turns chat updates into download tasks.
///
/// There is no per-message isolation here: the first failure aborts the rest
/// of the batch. The downloader isolates failures per message; the asymmetry
/// is kept as observed in production.
pub struct Receiver {
    bot: Arc<dyn BotApi>,
    queue: Arc<dyn TaskQueue>,
}

impl Receiver {
    pub fn new(bot: Arc<dyn BotApi>, queue: Arc<dyn TaskQueue>) -> Self {
        Self { bot, queue }
    }

    /// Handle a raw trigger payload (object or JSON string).
    pub async fn handle_value(&self, payload: Value) -> HandlerResponse {
        match decode_event("receiver", payload) {
            Some(event) => self.handle(&event).await,
            None => HandlerResponse::ok(),
        }
    }

    /// Handle a decoded trigger event. Always answers 200.
    pub async fn handle(&self, event: &QueueEvent) -> HandlerResponse {
        let timer = HANDLER_DURATION
            .with_label_values(&["receiver"])
            .start_timer();
        info!(messages = event.len(), "Receiver invoked");

        match self.process(event).await {
            Ok(report) => info!(
                accepted = report.videos_accepted,
                rejected = report.rejected,
                ignored = report.ignored,
                "Receiver batch complete"
            ),
            Err(e) => {
                BATCH_FAILURES.with_label_values(&["receiver"]).inc();
                error!(error = ?e, "Receiver batch aborted, remaining messages dropped");
            }
        }

        timer.observe_duration();
        HandlerResponse::ok()
    }

    /// Process the batch in delivery order, stopping at the first failure.
    pub async fn process(&self, event: &QueueEvent) -> Result<ReceiverReport, ReceiverError> {
        let mut report = ReceiverReport::default();

        for (index, message) in event.messages.iter().enumerate() {
            let Some(body) = message.body() else {
                debug!(index, "Skipping queue message without body");
                UPDATES_TOTAL.with_label_values(&["ignored"]).inc();
                report.ignored += 1;
                continue;
            };

            let update = Update::parse(body)
                .map_err(|source| ReceiverError::InvalidUpdate { index, source })?;

            let Some(chat_message) = update.message else {
                debug!(index, "Skipping update without message");
                UPDATES_TOTAL.with_label_values(&["ignored"]).inc();
                report.ignored += 1;
                continue;
            };

            let chat_id = chat_message.chat_id().ok_or(ReceiverError::MissingField {
                index,
                field: "message.chat.id",
            })?;

            match chat_message.video {
                Some(video) => {
                    let file_id = video
                        .file_id
                        .filter(|id| !id.is_empty())
                        .ok_or(ReceiverError::MissingField {
                            index,
                            field: "message.video.file_id",
                        })?;

                    notify(self.bot.as_ref(), chat_id, Notice::DownloadStarted)
                        .await
                        .map_err(|source| ReceiverError::Telegram { index, source })?;

                    let task = DownloadTask::new(file_id, chat_id);
                    self.queue
                        .publish(&task)
                        .await
                        .map_err(|source| ReceiverError::Queue { index, source })?;

                    TASKS_PUBLISHED.inc();
                    UPDATES_TOTAL.with_label_values(&["video"]).inc();
                    info!(chat_id, file_id = %task.file_id, "Video accepted, download task queued");
                    report.videos_accepted += 1;
                }
                None => {
                    notify(self.bot.as_ref(), chat_id, Notice::VideoOnly)
                        .await
                        .map_err(|source| ReceiverError::Telegram { index, source })?;

                    UPDATES_TOTAL.with_label_values(&["rejected"]).inc();
                    debug!(chat_id, "Non-video message rejected");
                    report.rejected += 1;
                }
            }
        }

        Ok(report)
    }
}
