//! Types for bot platform operations.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors that can occur during bot platform operations.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    /// The platform answered but refused the call (non-2xx or `ok: false`).
    #[error("Bot API rejected {method} (HTTP {status}): {description}")]
    Rejected {
        method: &'static str,
        status: u16,
        description: String,
    },

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TelegramError {
    /// Whether the platform itself refused the call, as opposed to a
    /// transport or decoding failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// An inbound update. Only the fields the pipeline reads are modelled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Update {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl Update {
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

/// A chat message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<Chat>,
    /// Present whenever the update has a `video` key, even a `null` one.
    #[serde(
        default,
        deserialize_with = "video_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub video: Option<Video>,
}

fn video_key<'de, D>(deserializer: D) -> Result<Option<Video>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(Option::<Video>::deserialize(deserializer)?.unwrap_or_default()))
}

impl Message {
    pub fn chat_id(&self) -> Option<i64> {
        self.chat.as_ref().and_then(|chat| chat.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

/// A video attachment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Standard Bot API response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

/// File metadata returned by `getFile`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    #[serde(default)]
    pub file_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// Transient path to pass to the file endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

/// Outcome of a `getFile` lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum FileLookup {
    Found(FileInfo),
    /// The platform answered `ok: false`.
    Unavailable { description: Option<String> },
}

/// Raw file download result. Non-success statuses are returned, not raised.
#[derive(Debug, Clone)]
pub struct FileDownload {
    pub status: u16,
    pub bytes: Bytes,
}

impl FileDownload {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Trait for bot platform backends.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Returns the name of this backend.
    fn name(&self) -> &str;

    /// Send a text message to a chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError>;

    /// Resolve a file id to its transient file path.
    async fn get_file(&self, file_id: &str) -> Result<FileLookup, TelegramError>;

    /// Fetch the raw bytes behind a file path.
    async fn download_file(&self, file_path: &str) -> Result<FileDownload, TelegramError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_update() {
        let update = Update::parse(
            r#"{"update_id":7,"message":{"message_id":1,"chat":{"id":42,"type":"private"},"video":{"file_id":"abc","duration":3}}}"#,
        )
        .unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.chat_id(), Some(42));
        assert_eq!(message.video.unwrap().file_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_parse_text_update() {
        let update = Update::parse(r#"{"message":{"chat":{"id":-100},"text":"hi"}}"#).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.chat_id(), Some(-100));
        assert!(message.video.is_none());
    }

    #[test]
    fn test_null_video_key_counts_as_video() {
        let update = Update::parse(r#"{"message":{"chat":{"id":42},"video":null}}"#).unwrap();
        let video = update.message.unwrap().video.unwrap();
        assert!(video.file_id.is_none());
    }

    #[test]
    fn test_parse_non_message_update() {
        let update = Update::parse(r#"{"update_id":1,"edited_message":{"chat":{"id":1}}}"#).unwrap();
        assert!(update.message.is_none());
    }

    #[test]
    fn test_api_response_failure() {
        let response: ApiResponse<FileInfo> = serde_json::from_str(
            r#"{"ok":false,"error_code":400,"description":"Bad Request: file is too big"}"#,
        )
        .unwrap();
        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(
            response.description.as_deref(),
            Some("Bad Request: file is too big")
        );
    }

    #[test]
    fn test_api_response_without_result() {
        let response: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(response.ok);
        assert!(response.result.is_none());
        assert!(response.description.is_none());
    }

    #[test]
    fn test_api_response_file_info() {
        let response: ApiResponse<FileInfo> = serde_json::from_str(
            r#"{"ok":true,"result":{"file_id":"abc","file_unique_id":"u","file_size":10,"file_path":"videos/file_0.mp4"}}"#,
        )
        .unwrap();
        let info = response.result.unwrap();
        assert_eq!(info.file_path.as_deref(), Some("videos/file_0.mp4"));
        assert_eq!(info.file_size, Some(10));
    }

    #[test]
    fn test_rejection_classification() {
        let rejected = TelegramError::Rejected {
            method: "sendMessage",
            status: 403,
            description: "Forbidden: bot was blocked by the user".to_string(),
        };
        assert!(rejected.is_rejection());
        assert!(!TelegramError::Timeout.is_rejection());
    }
}
