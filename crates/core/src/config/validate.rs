use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Every deployment secret and endpoint is present (fail fast at startup)
/// - Server port is not 0
/// - Bot API timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let required = [
        ("TG_TOKEN", &config.telegram.token),
        ("DOWNLOADER_QUEUE_URL", &config.queue.url),
        ("YC_ACCESS_KEY", &config.credentials.access_key),
        ("YC_SECRET_KEY", &config.credentials.secret_key),
        ("API_GW_DOMAIN", &config.public.domain),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingValue(name));
        }
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.telegram.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "telegram.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.storage.bucket.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.bucket cannot be empty".to_string(),
        ));
    }

    Ok(())
}
