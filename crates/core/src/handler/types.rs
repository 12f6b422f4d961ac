//! Shared handler types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use crate::event::QueueEvent;
use crate::metrics::NOTIFICATIONS_TOTAL;
use crate::telegram::{BotApi, TelegramError};

/// Handler return value, serialized as `{"statusCode": 200}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl HandlerResponse {
    pub fn ok() -> Self {
        Self { status_code: 200 }
    }
}

impl Default for HandlerResponse {
    fn default() -> Self {
        Self::ok()
    }
}

/// User-facing chat notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    /// Receiver accepted a video.
    DownloadStarted,
    /// Receiver got something other than a video.
    VideoOnly,
    /// Downloader could not resolve the file.
    FetchFailed,
    /// Downloader could not fetch the file bytes.
    DownloadFailed,
    /// Downloader stored the video.
    Delivered { url: &'a str },
    /// Downloader hit an unexpected failure.
    ProcessingError,
}

pub const DOWNLOAD_STARTED_TEXT: &str = "Началась загрузка видео...";
pub const VIDEO_ONLY_TEXT: &str = "Принимаю только видео.";
pub const FETCH_FAILED_TEXT: &str = "Failed to fetch your video from Telegram.";
pub const DOWNLOAD_FAILED_TEXT: &str = "Failed to download your video.";
pub const DELIVERED_PREFIX: &str = "Your video is available here: ";
pub const PROCESSING_ERROR_TEXT: &str = "An error occurred while processing your video.";

impl Notice<'_> {
    pub fn text(&self) -> String {
        match self {
            Notice::DownloadStarted => DOWNLOAD_STARTED_TEXT.to_string(),
            Notice::VideoOnly => VIDEO_ONLY_TEXT.to_string(),
            Notice::FetchFailed => FETCH_FAILED_TEXT.to_string(),
            Notice::DownloadFailed => DOWNLOAD_FAILED_TEXT.to_string(),
            Notice::Delivered { url } => format!("{}{}", DELIVERED_PREFIX, url),
            Notice::ProcessingError => PROCESSING_ERROR_TEXT.to_string(),
        }
    }

    /// Metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            Notice::DownloadStarted => "download_started",
            Notice::VideoOnly => "video_only",
            Notice::FetchFailed => "fetch_failed",
            Notice::DownloadFailed => "download_failed",
            Notice::Delivered { .. } => "delivered",
            Notice::ProcessingError => "processing_error",
        }
    }
}

/// Send a notification.
///
/// A refusal by the platform (blocked bot, deleted chat) is logged and
/// swallowed; transport failures are returned to the caller.
pub(crate) async fn notify(
    bot: &dyn BotApi,
    chat_id: i64,
    notice: Notice<'_>,
) -> Result<(), TelegramError> {
    match bot.send_message(chat_id, &notice.text()).await {
        Ok(()) => {
            NOTIFICATIONS_TOTAL.with_label_values(&[notice.kind()]).inc();
            Ok(())
        }
        Err(e) if e.is_rejection() => {
            warn!(chat_id, kind = notice.kind(), error = %e, "Notification rejected by bot API");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Decode a raw trigger payload, logging instead of failing.
pub(crate) fn decode_event(handler: &'static str, payload: Value) -> Option<QueueEvent> {
    match QueueEvent::from_value(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            error!(handler, error = %e, "Discarding undecodable trigger event");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_response_wire_format() {
        let json = serde_json::to_value(HandlerResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"statusCode": 200}));
    }

    #[test]
    fn test_notice_texts() {
        assert_eq!(Notice::DownloadStarted.text(), "Началась загрузка видео...");
        assert_eq!(Notice::VideoOnly.text(), "Принимаю только видео.");
        assert_eq!(
            Notice::Delivered {
                url: "https://gw/video/videos/a.mp4"
            }
            .text(),
            "Your video is available here: https://gw/video/videos/a.mp4"
        );
    }

    #[test]
    fn test_decode_event_invalid_is_none() {
        assert!(decode_event("receiver", serde_json::json!({"messages": "x"})).is_none());
        assert!(decode_event("receiver", serde_json::json!({"messages": []})).is_some());
    }
}
