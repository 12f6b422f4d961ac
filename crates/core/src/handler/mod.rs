//! Queue-triggered event handlers.
//!
//! Two independent, stateless handlers make up the pipeline:
//! - [`Receiver`] turns chat updates into download tasks
//! - [`Downloader`] turns download tasks into stored videos and a reply link
//!
//! Both always answer `{"statusCode": 200}`; failures surface only in logs,
//! metrics and best-effort chat notifications.

mod downloader;
mod receiver;
mod types;

pub use downloader::{
    DownloadError, DownloadOutcome, Downloader, DownloaderReport, DownloaderSettings,
    MessageFailure,
};
pub use receiver::{Receiver, ReceiverError, ReceiverReport};
pub use types::*;
