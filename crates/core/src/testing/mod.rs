//! Testing utilities and mock implementations.
//!
//! Mocks for every external service trait, so both handlers can be driven
//! end to end without a bot platform, a queue or a bucket.
//!
//! # Example
//!
//! ```rust,ignore
//! use vidrelay_core::testing::{fixtures, MockBotApi, MockTaskQueue};
//!
//! let bot = Arc::new(MockBotApi::new());
//! let queue = Arc::new(MockTaskQueue::new());
//! let receiver = Receiver::new(bot.clone(), queue.clone());
//!
//! receiver.handle(&fixtures::event([fixtures::video_update_body(42, "abc")])).await;
//! assert_eq!(queue.publish_count().await, 1);
//! ```

mod mock_bot;
mod mock_queue;
mod mock_storage;

pub use mock_bot::{MockBotApi, SentMessage};
pub use mock_queue::MockTaskQueue;
pub use mock_storage::{MockObjectStorage, RecordedPut};

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::json;

    use crate::config::PublicUrlConfig;
    use crate::event::QueueEvent;
    use crate::handler::DownloaderSettings;

    /// A chat update carrying a video.
    pub fn video_update_body(chat_id: i64, file_id: &str) -> String {
        json!({
            "update_id": 1,
            "message": {
                "message_id": 10,
                "chat": {"id": chat_id, "type": "private"},
                "video": {
                    "file_id": file_id,
                    "duration": 3,
                    "mime_type": "video/mp4",
                    "file_size": 1024
                }
            }
        })
        .to_string()
    }

    /// A chat update carrying plain text.
    pub fn text_update_body(chat_id: i64, text: &str) -> String {
        json!({
            "update_id": 2,
            "message": {
                "message_id": 11,
                "chat": {"id": chat_id, "type": "private"},
                "text": text
            }
        })
        .to_string()
    }

    /// An update with no `message` (e.g. an edited message or callback).
    pub fn non_message_update_body() -> String {
        json!({
            "update_id": 3,
            "edited_message": {"chat": {"id": 1}, "text": "edited"}
        })
        .to_string()
    }

    /// A download task body as published by the receiver.
    pub fn task_body(file_id: &str, chat_id: i64) -> String {
        json!({"file_id": file_id, "chat_id": chat_id}).to_string()
    }

    /// Wrap bodies into a trigger event.
    pub fn event<I, S>(bodies: I) -> QueueEvent
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueueEvent::from_bodies(bodies)
    }

    /// Downloader settings with the default key layout.
    pub fn downloader_settings(domain: &str) -> DownloaderSettings {
        DownloaderSettings {
            key_prefix: "videos".to_string(),
            extension: "mp4".to_string(),
            public: PublicUrlConfig {
                domain: domain.to_string(),
                ..PublicUrlConfig::default()
            },
        }
    }
}
