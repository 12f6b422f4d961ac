//! Object storage for relayed videos.

mod s3;
mod types;

pub use s3::S3VideoStorage;
pub use types::*;
