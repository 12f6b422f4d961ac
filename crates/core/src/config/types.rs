use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub credentials: CloudCredentials,
    #[serde(default)]
    pub public: PublicUrlConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Bot API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    /// Bot token (`TG_TOKEN`)
    #[serde(default)]
    pub token: String,
    /// Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
    /// Request timeout in seconds (default: 120)
    #[serde(default = "default_telegram_timeout")]
    pub timeout_secs: u32,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_telegram_api_url(),
            timeout_secs: default_telegram_timeout(),
        }
    }
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_telegram_timeout() -> u32 {
    120
}

/// Downstream task queue configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Queue URL the receiver publishes download tasks to (`DOWNLOADER_QUEUE_URL`)
    #[serde(default)]
    pub url: String,
    /// SQS-compatible API endpoint
    #[serde(default = "default_queue_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            endpoint: default_queue_endpoint(),
            region: default_region(),
        }
    }
}

fn default_queue_endpoint() -> String {
    "https://message-queue.api.cloud.yandex.net".to_string()
}

fn default_region() -> String {
    "ru-central1".to_string()
}

/// Object storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// S3-compatible API endpoint
    #[serde(default = "default_storage_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Key prefix for stored videos (e.g. "videos")
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// File extension for stored videos
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            endpoint: default_storage_endpoint(),
            region: default_region(),
            key_prefix: default_key_prefix(),
            extension: default_extension(),
        }
    }
}

fn default_bucket() -> String {
    "vvot23-tg-video-new".to_string()
}

fn default_storage_endpoint() -> String {
    "https://storage.yandexcloud.net".to_string()
}

fn default_key_prefix() -> String {
    "videos".to_string()
}

fn default_extension() -> String {
    "mp4".to_string()
}

/// Static cloud credentials shared by the queue and storage clients
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct CloudCredentials {
    /// `YC_ACCESS_KEY`
    #[serde(default)]
    pub access_key: String,
    /// `YC_SECRET_KEY`
    #[serde(default)]
    pub secret_key: String,
}

impl std::fmt::Debug for CloudCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudCredentials")
            .field("access_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Public retrieval URL configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublicUrlConfig {
    /// API gateway domain serving stored videos (`API_GW_DOMAIN`)
    #[serde(default)]
    pub domain: String,
    /// Gateway path in front of the storage key
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
}

impl Default for PublicUrlConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            path_prefix: default_path_prefix(),
        }
    }
}

fn default_path_prefix() -> String {
    "video".to_string()
}

impl PublicUrlConfig {
    /// Build the public retrieval URL for a storage key.
    pub fn url_for(&self, key: &str) -> String {
        let domain = self.domain.trim_end_matches('/');
        let prefix = self.path_prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("https://{}/{}", domain, key)
        } else {
            format!("https://{}/{}/{}", domain, prefix, key)
        }
    }
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub telegram: SanitizedTelegramConfig,
    pub queue: QueueConfig,
    pub storage: StorageConfig,
    pub credentials: SanitizedCredentials,
    pub public: PublicUrlConfig,
}

/// Sanitized bot config (token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTelegramConfig {
    pub api_url: String,
    pub token_configured: bool,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCredentials {
    pub access_key_configured: bool,
    pub secret_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            telegram: SanitizedTelegramConfig {
                api_url: config.telegram.api_url.clone(),
                token_configured: !config.telegram.token.is_empty(),
                timeout_secs: config.telegram.timeout_secs,
            },
            queue: config.queue.clone(),
            storage: config.storage.clone(),
            credentials: SanitizedCredentials {
                access_key_configured: !config.credentials.access_key.is_empty(),
                secret_key_configured: !config.credentials.secret_key.is_empty(),
            },
            public: config.public.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[telegram]
token = "123:abc"

[queue]
url = "https://message-queue.api.cloud.yandex.net/b1g/dj6/downloader"

[credentials]
access_key = "ak"
secret_key = "sk"

[public]
domain = "d5dexample.apigw.yandexcloud.net"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.telegram.token, "123:abc");
        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
        assert_eq!(config.credentials.access_key, "ak");
        assert_eq!(config.public.domain, "d5dexample.apigw.yandexcloud.net");
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.storage.bucket, "vvot23-tg-video-new");
        assert_eq!(config.storage.endpoint, "https://storage.yandexcloud.net");
        assert_eq!(config.storage.key_prefix, "videos");
        assert_eq!(config.storage.extension, "mp4");
        assert_eq!(config.queue.region, "ru-central1");
        assert_eq!(config.public.path_prefix, "video");
        assert_eq!(config.telegram.timeout_secs, 120);
        assert!(config.telegram.token.is_empty());
    }

    #[test]
    fn test_public_url_for_key() {
        let public = PublicUrlConfig {
            domain: "gw.example.net".to_string(),
            path_prefix: "video".to_string(),
        };
        assert_eq!(
            public.url_for("videos/abc.mp4"),
            "https://gw.example.net/video/videos/abc.mp4"
        );
    }

    #[test]
    fn test_public_url_trims_slashes() {
        let public = PublicUrlConfig {
            domain: "gw.example.net/".to_string(),
            path_prefix: "/video/".to_string(),
        };
        assert_eq!(
            public.url_for("videos/abc.mp4"),
            "https://gw.example.net/video/videos/abc.mp4"
        );

        let bare = PublicUrlConfig {
            domain: "gw.example.net".to_string(),
            path_prefix: String::new(),
        };
        assert_eq!(bare.url_for("videos/abc.mp4"), "https://gw.example.net/videos/abc.mp4");
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = CloudCredentials {
            access_key: "visible-ak".to_string(),
            secret_key: "visible-sk".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("visible-ak"));
        assert!(!debug.contains("visible-sk"));
    }

    #[test]
    fn test_sanitized_config_hides_secrets() {
        let mut config = Config::default();
        config.telegram.token = "secret-token".to_string();
        config.credentials.access_key = "ak".to_string();

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.telegram.token_configured);
        assert!(sanitized.credentials.access_key_configured);
        assert!(!sanitized.credentials.secret_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-token"));
    }
}
