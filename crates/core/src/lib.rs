pub mod config;
pub mod event;
pub mod handler;
pub mod metrics;
pub mod queue;
pub mod storage;
pub mod task;
pub mod telegram;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    CONFIG_PATH_ENV,
};
pub use event::{EventError, QueueEvent, QueueMessage};
pub use handler::{
    DownloadError, DownloadOutcome, Downloader, DownloaderReport, DownloaderSettings,
    HandlerResponse, MessageFailure, Notice, Receiver, ReceiverError, ReceiverReport,
};
pub use queue::{PublishReceipt, QueueError, SqsTaskQueue, TaskQueue};
pub use storage::{ObjectStorage, S3VideoStorage, StorageError, StoredObject, VideoKey};
pub use task::{DownloadTask, RawTask, TaskError};
pub use telegram::{BotApi, FileDownload, FileLookup, TelegramBotClient, TelegramError, Update};
