use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "VIDRELAY_CONFIG";

/// Deployment variables and the config keys they populate.
const DEPLOYMENT_ENV: &[(&str, &str)] = &[
    ("TG_TOKEN", "telegram.token"),
    ("DOWNLOADER_QUEUE_URL", "queue.url"),
    ("YC_ACCESS_KEY", "credentials.access_key"),
    ("YC_SECRET_KEY", "credentials.secret_key"),
    ("API_GW_DOMAIN", "public.domain"),
    ("PORT", "server.port"),
];

/// Load configuration from an optional TOML file, then environment overrides.
///
/// Precedence (later wins): defaults, file, `VIDRELAY_<SECTION>__<KEY>`,
/// deployment variables (`TG_TOKEN`, `DOWNLOADER_QUEUE_URL`, ...).
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    let config: Config = figment
        .merge(
            Env::prefixed("VIDRELAY_")
                .ignore(&["config"])
                .split("__"),
        )
        .merge(deployment_env())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn deployment_env() -> Env {
    let names: Vec<&str> = DEPLOYMENT_ENV.iter().map(|(name, _)| *name).collect();

    Env::raw().only(&names).map(|key| {
        DEPLOYMENT_ENV
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, path)| (*path).into())
            .unwrap_or_else(|| key.as_str().into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[server]
port = 9000

[telegram]
token = "123:abc"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.telegram.token, "123:abc");
    }

    #[test]
    fn test_load_config_from_str_invalid_type() {
        let toml = r#"
[server]
port = "not-a-port"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"
port = 3000

[storage]
bucket = "other-bucket"
"#
        )
        .unwrap();

        let config = load_config(Some(temp_file.path())).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.storage.bucket, "other-bucket");
    }

    #[test]
    fn test_deployment_env_populates_config() {
        Jail::expect_with(|jail| {
            jail.set_env("TG_TOKEN", "123:abc");
            jail.set_env(
                "DOWNLOADER_QUEUE_URL",
                "https://message-queue.api.cloud.yandex.net/b1g/dj6/downloader",
            );
            jail.set_env("YC_ACCESS_KEY", "ak");
            jail.set_env("YC_SECRET_KEY", "sk");
            jail.set_env("API_GW_DOMAIN", "gw.example.net");
            jail.set_env("PORT", "9090");

            let config = load_config(None).map_err(|e| e.to_string())?;
            assert_eq!(config.telegram.token, "123:abc");
            assert_eq!(
                config.queue.url,
                "https://message-queue.api.cloud.yandex.net/b1g/dj6/downloader"
            );
            assert_eq!(config.credentials.access_key, "ak");
            assert_eq!(config.credentials.secret_key, "sk");
            assert_eq!(config.public.domain, "gw.example.net");
            assert_eq!(config.server.port, 9090);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "vidrelay.toml",
                r#"
[telegram]
token = "from-file"
timeout_secs = 30

[storage]
bucket = "file-bucket"
"#,
            )?;
            jail.set_env("TG_TOKEN", "from-env");
            jail.set_env("VIDRELAY_STORAGE__BUCKET", "env-bucket");

            let config = load_config(Some(Path::new("vidrelay.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.telegram.token, "from-env");
            assert_eq!(config.telegram.timeout_secs, 30);
            assert_eq!(config.storage.bucket, "env-bucket");
            Ok(())
        });
    }
}
