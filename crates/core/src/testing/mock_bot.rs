//! Mock bot API for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::telegram::{BotApi, FileDownload, FileInfo, FileLookup, TelegramError};

/// A message recorded by [`MockBotApi::send_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
}

/// Mock implementation of the BotApi trait.
///
/// Every file id resolves to `videos/<file_id>.mp4` and every path downloads
/// as status 200 with a small payload, unless overridden.
///
/// # Example
///
/// ```rust,ignore
/// use vidrelay_core::testing::MockBotApi;
///
/// let bot = MockBotApi::new();
/// bot.set_download("videos/abc.mp4", 404, Vec::new()).await;
///
/// // ... run a handler ...
///
/// assert_eq!(bot.sent_messages().await[0].text, "Failed to download your video.");
/// ```
#[derive(Debug, Clone)]
pub struct MockBotApi {
    sent: Arc<RwLock<Vec<SentMessage>>>,
    lookups: Arc<RwLock<Vec<String>>>,
    downloads: Arc<RwLock<Vec<String>>>,
    file_lookups: Arc<RwLock<HashMap<String, FileLookup>>>,
    file_contents: Arc<RwLock<HashMap<String, FileDownload>>>,
    next_send_error: Arc<RwLock<Option<TelegramError>>>,
    next_get_file_error: Arc<RwLock<Option<TelegramError>>>,
    next_download_error: Arc<RwLock<Option<TelegramError>>>,
}

impl Default for MockBotApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBotApi {
    /// Payload served for paths without an explicit download configured.
    pub const DEFAULT_CONTENT: &'static [u8] = b"\x00\x00\x00\x18ftypmp42";

    pub fn new() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
            lookups: Arc::new(RwLock::new(Vec::new())),
            downloads: Arc::new(RwLock::new(Vec::new())),
            file_lookups: Arc::new(RwLock::new(HashMap::new())),
            file_contents: Arc::new(RwLock::new(HashMap::new())),
            next_send_error: Arc::new(RwLock::new(None)),
            next_get_file_error: Arc::new(RwLock::new(None)),
            next_download_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Get all messages sent so far, in order.
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.read().await.clone()
    }

    /// Messages sent to one chat, in order.
    pub async fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .read()
            .await
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text.clone())
            .collect()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.read().await.len()
    }

    /// File ids passed to `get_file`, in order.
    pub async fn lookups(&self) -> Vec<String> {
        self.lookups.read().await.clone()
    }

    /// File paths passed to `download_file`, in order.
    pub async fn downloads(&self) -> Vec<String> {
        self.downloads.read().await.clone()
    }

    /// Override the lookup result for a file id.
    pub async fn set_file_lookup(&self, file_id: &str, lookup: FileLookup) {
        self.file_lookups
            .write()
            .await
            .insert(file_id.to_string(), lookup);
    }

    /// Make a file id resolve to `ok: false`.
    pub async fn set_file_unavailable(&self, file_id: &str) {
        self.set_file_lookup(
            file_id,
            FileLookup::Unavailable {
                description: Some("Bad Request: file is too big".to_string()),
            },
        )
        .await;
    }

    /// Override the download result for a file path.
    pub async fn set_download(&self, file_path: &str, status: u16, content: impl Into<Bytes>) {
        self.file_contents.write().await.insert(
            file_path.to_string(),
            FileDownload {
                status,
                bytes: content.into(),
            },
        );
    }

    /// Configure the next `send_message` to fail with the given error.
    pub async fn set_next_send_error(&self, error: TelegramError) {
        *self.next_send_error.write().await = Some(error);
    }

    /// Configure the next `get_file` to fail with the given error.
    pub async fn set_next_get_file_error(&self, error: TelegramError) {
        *self.next_get_file_error.write().await = Some(error);
    }

    /// Configure the next `download_file` to fail with the given error.
    pub async fn set_next_download_error(&self, error: TelegramError) {
        *self.next_download_error.write().await = Some(error);
    }

    /// Path a file id resolves to by default.
    pub fn default_file_path(file_id: &str) -> String {
        format!("videos/{}.mp4", file_id)
    }
}

#[async_trait]
impl BotApi for MockBotApi {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        if let Some(error) = self.next_send_error.write().await.take() {
            return Err(error);
        }

        self.sent.write().await.push(SentMessage {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn get_file(&self, file_id: &str) -> Result<FileLookup, TelegramError> {
        self.lookups.write().await.push(file_id.to_string());

        if let Some(error) = self.next_get_file_error.write().await.take() {
            return Err(error);
        }

        if let Some(lookup) = self.file_lookups.read().await.get(file_id) {
            return Ok(lookup.clone());
        }

        Ok(FileLookup::Found(FileInfo {
            file_id: file_id.to_string(),
            file_size: Some(Self::DEFAULT_CONTENT.len() as u64),
            file_path: Some(Self::default_file_path(file_id)),
        }))
    }

    async fn download_file(&self, file_path: &str) -> Result<FileDownload, TelegramError> {
        self.downloads.write().await.push(file_path.to_string());

        if let Some(error) = self.next_download_error.write().await.take() {
            return Err(error);
        }

        if let Some(download) = self.file_contents.read().await.get(file_path) {
            return Ok(download.clone());
        }

        Ok(FileDownload {
            status: 200,
            bytes: Bytes::from_static(Self::DEFAULT_CONTENT),
        })
    }
}
