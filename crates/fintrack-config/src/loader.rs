//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use fintrack_core::FintrackError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Single-variable overrides understood by older deployment scripts.
///
/// They are applied after every other source, so `PORT=8080` wins over
/// both the TOML files and `FINTRACK__SERVER__PORT`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyEnv {
    pub port: Option<String>,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
}

impl LegacyEnv {
    /// Reads `PORT`, `DATABASE_URL` and `REDIS_URL` from the process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            port: std::env::var("PORT").ok(),
            database_url: std::env::var("DATABASE_URL").ok(),
            redis_url: std::env::var("REDIS_URL").ok(),
        }
    }
}

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
    legacy: LegacyEnv,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Untracked local overrides
    /// 4. Environment variables with `FINTRACK__` prefix
    /// 5. `PORT`, `DATABASE_URL`, `REDIS_URL`
    pub fn new(config_dir: impl Into<String>) -> Result<Self, FintrackError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }
        Self::with_legacy_env(config_dir, LegacyEnv::from_process())
    }

    /// Creates a loader with explicit legacy overrides instead of reading them from the process.
    pub fn with_legacy_env(
        config_dir: impl Into<String>,
        legacy: LegacyEnv,
    ) -> Result<Self, FintrackError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir, &legacy)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
            legacy,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, FintrackError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), FintrackError> {
        let new_config = Self::load_config(&self.config_dir, &self.legacy)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    fn load_config(config_dir: &str, legacy: &LegacyEnv) -> Result<AppConfig, FintrackError> {
        let environment =
            std::env::var("FINTRACK_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for layer in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, layer);
            if Path::new(&path).exists() {
                debug!("Loading config layer from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder
            .add_source(
                Environment::with_prefix("FINTRACK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", legacy.port.clone())
            .map_err(config_error_to_fintrack_error)?
            .set_override_option("database.url", legacy.database_url.clone())
            .map_err(config_error_to_fintrack_error)?
            .set_override_option("redis.url", legacy.redis_url.clone())
            .map_err(config_error_to_fintrack_error)?;

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_fintrack_error)?;

        ConfigValidator::validate(&app_config).map_err(|errors| {
            FintrackError::Configuration(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        Ok(app_config)
    }

    /// Gets a specific configuration value by dotted key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

fn config_error_to_fintrack_error(err: ConfigError) -> FintrackError {
    FintrackError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheBackend;
    use std::fs;

    fn write_default(dir: &Path, contents: &str) {
        fs::write(dir.join("default.toml"), contents).unwrap();
    }

    #[tokio::test]
    async fn test_loads_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        write_default(
            dir.path(),
            "[cache]\nttl_secs = 120\nnamespace = \"ledger\"\nbackend = \"memory\"\n",
        );

        let loader =
            ConfigLoader::with_legacy_env(dir.path().to_string_lossy(), LegacyEnv::default())
                .unwrap();
        let config = loader.get().await;
        assert_eq!(config.cache.ttl_secs, 120);
        assert_eq!(config.cache.namespace, "ledger");
        assert_eq!(config.cache.scan_batch_size, 100);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
    }

    #[tokio::test]
    async fn test_legacy_overrides_win() {
        let dir = tempfile::tempdir().unwrap();
        write_default(dir.path(), "[server]\nport = 7000\n");

        let legacy = LegacyEnv {
            port: Some("8088".to_string()),
            database_url: Some("mysql://u:p@db:3306/ledger".to_string()),
            redis_url: Some("redis://cache:6380".to_string()),
        };
        let loader = ConfigLoader::with_legacy_env(dir.path().to_string_lossy(), legacy).unwrap();
        let config = loader.get().await;
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.database.url, "mysql://u:p@db:3306/ledger");
        assert_eq!(config.redis.url, "redis://cache:6380");
    }

    #[tokio::test]
    async fn test_invalid_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        write_default(dir.path(), "[cache]\nnamespace = \"bad:ns\"\n");

        let result =
            ConfigLoader::with_legacy_env(dir.path().to_string_lossy(), LegacyEnv::default());
        match result {
            Err(FintrackError::Configuration(message)) => {
                assert!(message.contains("bad:ns"));
            }
            other => panic!("Expected configuration error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_get_value_by_path() {
        let dir = tempfile::tempdir().unwrap();
        let loader =
            ConfigLoader::with_legacy_env(dir.path().to_string_lossy(), LegacyEnv::default())
                .unwrap();
        let ttl: Option<u64> = loader.get_value("cache.ttl_secs").await;
        assert_eq!(ttl, Some(300));
        let missing: Option<u64> = loader.get_value("cache.nope").await;
        assert!(missing.is_none());
    }
}
