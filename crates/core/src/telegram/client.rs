//! Telegram Bot API client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::config::TelegramConfig;

use super::{ApiResponse, BotApi, FileDownload, FileInfo, FileLookup, TelegramError};

/// Telegram Bot API client.
pub struct TelegramBotClient {
    client: Client,
    config: TelegramConfig,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

impl TelegramBotClient {
    /// Create a new client. The underlying HTTP client is built once and reused.
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| TelegramError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url(), self.config.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.base_url(),
            self.config.token,
            file_path.trim_start_matches('/')
        )
    }

    /// Decode a Bot API envelope, turning non-2xx and `ok: false` into a rejection.
    async fn decode<T: DeserializeOwned>(
        method: &'static str,
        response: Response,
    ) -> Result<ApiResponse<T>, TelegramError> {
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        let parsed: ApiResponse<T> = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::Rejected {
                    method,
                    status: status.as_u16(),
                    description: body.chars().take(200).collect(),
                });
            }
            Err(e) => {
                return Err(TelegramError::ApiError(format!(
                    "Failed to parse {} response: {}",
                    method, e
                )));
            }
        };

        Ok(parsed)
    }
}

/// Classify a reqwest error. The URL is stripped because it embeds the bot token.
fn map_transport_error(e: reqwest::Error) -> TelegramError {
    let e = e.without_url();
    if e.is_timeout() {
        TelegramError::Timeout
    } else if e.is_connect() {
        TelegramError::ConnectionFailed(e.to_string())
    } else {
        TelegramError::ApiError(e.to_string())
    }
}

#[async_trait]
impl BotApi for TelegramBotClient {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        debug!(chat_id, "Sending message");

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        let parsed: ApiResponse<serde_json::Value> = Self::decode("sendMessage", response).await?;
        if !parsed.ok {
            return Err(TelegramError::Rejected {
                method: "sendMessage",
                status,
                description: parsed.description.unwrap_or_default(),
            });
        }

        Ok(())
    }

    async fn get_file(&self, file_id: &str) -> Result<FileLookup, TelegramError> {
        debug!(file_id, "Resolving file");

        let url = format!(
            "{}?file_id={}",
            self.method_url("getFile"),
            urlencoding::encode(file_id)
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?;

        // A failed lookup is reported in-band; the caller decides what to tell the user.
        let parsed = match Self::decode::<FileInfo>("getFile", response).await {
            Ok(parsed) => parsed,
            Err(TelegramError::Rejected { description, .. }) => {
                return Ok(FileLookup::Unavailable {
                    description: Some(description),
                });
            }
            Err(e) => return Err(e),
        };

        match (parsed.ok, parsed.result) {
            (true, Some(info)) => Ok(FileLookup::Found(info)),
            (true, None) => Err(TelegramError::ApiError(
                "getFile succeeded without a result".to_string(),
            )),
            (false, _) => Ok(FileLookup::Unavailable {
                description: parsed.description,
            }),
        }
    }

    async fn download_file(&self, file_path: &str) -> Result<FileDownload, TelegramError> {
        debug!(file_path, "Downloading file");

        let response = self
            .client
            .get(self.file_url(file_path))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            return Ok(FileDownload {
                status,
                bytes: Default::default(),
            });
        }

        let bytes = response.bytes().await.map_err(map_transport_error)?;
        Ok(FileDownload { status, bytes })
    }
}
