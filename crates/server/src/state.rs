use std::sync::Arc;

use vidrelay_core::{Config, Downloader, Receiver, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    receiver: Arc<Receiver>,
    downloader: Arc<Downloader>,
}

impl AppState {
    pub fn new(config: Config, receiver: Arc<Receiver>, downloader: Arc<Downloader>) -> Self {
        Self {
            config,
            receiver,
            downloader,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn receiver(&self) -> &Receiver {
        self.receiver.as_ref()
    }

    pub fn downloader(&self) -> &Downloader {
        self.downloader.as_ref()
    }
}
