//! Downstream task queue abstraction.
//!
//! The receiver hands download tasks to the downloader through a message
//! queue. `TaskQueue` hides the transport; `SqsTaskQueue` talks to any
//! SQS-compatible endpoint (Yandex Message Queue by default).

mod sqs;
mod types;

pub use sqs::SqsTaskQueue;
pub use types::*;
