use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidrelay_core::{
    load_config, validate_config, BotApi, Downloader, DownloaderSettings, ObjectStorage, Receiver,
    S3VideoStorage, SanitizedConfig, SqsTaskQueue, TaskQueue, TelegramBotClient, CONFIG_PATH_ENV,
};
use vidrelay_server::api::create_router;
use vidrelay_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config file picked up from the working directory when no path is given.
const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(version = VERSION, "Starting vidrelay");

    // An explicit path must exist; the default file is optional.
    let config_path = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => Some(PathBuf::from(path)),
        Err(_) => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    };

    match &config_path {
        Some(path) => info!("Loading configuration from {:?}", path),
        None => info!("No config file, using environment only"),
    }
    let config = load_config(config_path.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(config_hash = &config_hash[..16], "Configuration loaded successfully");
    info!("Storage bucket: {}", config.storage.bucket);
    info!("Public URL domain: {}", config.public.domain);

    // Long-lived clients, shared by every invocation
    let bot: Arc<dyn BotApi> = Arc::new(
        TelegramBotClient::new(config.telegram.clone())
            .context("Failed to create bot API client")?,
    );
    info!("Bot API client initialized ({})", config.telegram.api_url);

    let queue: Arc<dyn TaskQueue> =
        Arc::new(SqsTaskQueue::new(&config.queue, &config.credentials).await);
    info!("Task queue initialized ({})", config.queue.endpoint);

    let storage: Arc<dyn ObjectStorage> = Arc::new(
        S3VideoStorage::new(&config.storage, &config.credentials)
            .context("Failed to create object storage client")?,
    );
    info!(
        "Object storage initialized ({}, bucket {})",
        config.storage.endpoint,
        storage.bucket()
    );

    let receiver = Arc::new(Receiver::new(Arc::clone(&bot), queue));
    let downloader = Arc::new(Downloader::new(
        bot,
        storage,
        DownloaderSettings::from_config(&config),
    ));

    let state = Arc::new(AppState::new(config.clone(), receiver, downloader));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
