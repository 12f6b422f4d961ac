//! Download task descriptors passed from the receiver to the downloader.

mod types;

pub use types::*;
