//! Configuration validation.
//!
//! Every section is checked and all problems are reported together, so a
//! misconfigured deployment fails once at startup with the full list.

use crate::{AppConfig, CacheConfig, DatabaseConfig, ObservabilityConfig, RedisConfig, ServerConfig};
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Port number is invalid (must be 1-65535).
    InvalidPort { name: String, value: u16 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size is zero or exceeds the maximum allowed.
    PoolSizeOutOfRange { name: String, value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout or TTL must be positive.
    NonPositiveDuration { name: String },
    /// Cache namespace would break key segmentation or pattern matching.
    InvalidCacheNamespace { value: String },
    /// SCAN batch size must be positive.
    InvalidScanBatchSize,
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// Log format is invalid.
    InvalidLogFormat { value: String },
    /// Route prefixes must be absolute paths.
    InvalidPath { name: String, value: String },
    /// Path is already served by another route.
    ReservedPath { name: String, value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {}: {} (must be 1-65535)", name, value)
            }
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({}) cannot be greater than max ({})",
                    min, max
                )
            }
            Self::PoolSizeOutOfRange { name, value, maximum } => {
                write!(f, "Pool size {} for {} must be between 1 and {}", value, name, maximum)
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::NonPositiveDuration { name } => {
                write!(f, "'{}' must be positive", name)
            }
            Self::InvalidCacheNamespace { value } => {
                write!(
                    f,
                    "Invalid cache namespace '{}': must be non-empty and contain none of : * ? [ ] \\",
                    value
                )
            }
            Self::InvalidScanBatchSize => write!(f, "cache.scan_batch_size must be positive"),
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                    value
                )
            }
            Self::InvalidLogFormat { value } => {
                write!(f, "Invalid log format: '{}' (valid: pretty, json)", value)
            }
            Self::InvalidPath { name, value } => {
                write!(f, "{} must start with '/', got '{}'", name, value)
            }
            Self::ReservedPath { name, value } => {
                write!(f, "{} '{}' collides with a built-in route", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Result of configuration validation containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    errors: Vec<ConfigValidationError>,
}

impl ValidationResult {
    fn add_error(&mut self, error: ConfigValidationError) {
        self.errors.push(error);
    }

    /// Returns true if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the validation errors.
    #[must_use]
    pub fn errors(&self) -> &[ConfigValidationError] {
        &self.errors
    }

    /// Converts to Result, returning Err with all errors if any exist.
    pub fn into_result(self) -> Result<(), Vec<ConfigValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    const MAX_POOL_SIZE: u32 = 1000;
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];
    const VALID_LOG_FORMATS: &'static [&'static str] = &["pretty", "json"];
    const NAMESPACE_FORBIDDEN: &'static [char] = &[':', '*', '?', '[', ']', '\\'];
    const RESERVED_ROUTES: &'static [&'static str] =
        &["/", "/health", "/ready", "/live", "/api-docs/openapi.json"];
    const RESERVED_PREFIXES: &'static [&'static str] = &["/swagger-ui"];

    /// Validates the entire application configuration.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::default();

        Self::validate_server(&config.server, &mut result);
        Self::validate_database(&config.database, &mut result);
        Self::validate_redis(&config.redis, &mut result);
        Self::validate_cache(&config.cache, &mut result);
        Self::validate_observability(&config.observability, &config.server, &mut result);

        result.into_result()
    }

    fn validate_server(config: &ServerConfig, result: &mut ValidationResult) {
        if config.port == 0 {
            result.add_error(ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                value: config.port,
            });
        }
        if config.request_timeout_secs == 0 {
            result.add_error(ConfigValidationError::NonPositiveDuration {
                name: "server.request_timeout_secs".to_string(),
            });
        }
        if !config.api_prefix.starts_with('/') {
            result.add_error(ConfigValidationError::InvalidPath {
                name: "server.api_prefix".to_string(),
                value: config.api_prefix.clone(),
            });
        }
    }

    fn validate_database(config: &DatabaseConfig, result: &mut ValidationResult) {
        Self::check_url("database", &config.url, &["mysql"], result);

        if config.min_connections > config.max_connections {
            result.add_error(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections == 0 || config.max_connections > Self::MAX_POOL_SIZE {
            result.add_error(ConfigValidationError::PoolSizeOutOfRange {
                name: "database.max_connections".to_string(),
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
        if config.connect_timeout_secs == 0 {
            result.add_error(ConfigValidationError::NonPositiveDuration {
                name: "database.connect_timeout_secs".to_string(),
            });
        }
        if config.idle_timeout_secs == 0 {
            result.add_error(ConfigValidationError::NonPositiveDuration {
                name: "database.idle_timeout_secs".to_string(),
            });
        }
    }

    fn validate_redis(config: &RedisConfig, result: &mut ValidationResult) {
        if !config.enabled {
            return;
        }

        Self::check_url("redis", &config.url, &["redis", "rediss"], result);

        if config.pool_size == 0 || config.pool_size > Self::MAX_POOL_SIZE {
            result.add_error(ConfigValidationError::PoolSizeOutOfRange {
                name: "redis.pool_size".to_string(),
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
    }

    fn validate_cache(config: &CacheConfig, result: &mut ValidationResult) {
        if config.namespace.is_empty() || config.namespace.contains(Self::NAMESPACE_FORBIDDEN) {
            result.add_error(ConfigValidationError::InvalidCacheNamespace {
                value: config.namespace.clone(),
            });
        }
        if config.ttl_secs == 0 {
            result.add_error(ConfigValidationError::NonPositiveDuration {
                name: "cache.ttl_secs".to_string(),
            });
        }
        if config.scan_batch_size == 0 {
            result.add_error(ConfigValidationError::InvalidScanBatchSize);
        }
    }

    fn validate_observability(
        config: &ObservabilityConfig,
        server: &ServerConfig,
        result: &mut ValidationResult,
    ) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }

        let format = config.log_format.to_lowercase();
        if !Self::VALID_LOG_FORMATS.contains(&format.as_str()) {
            result.add_error(ConfigValidationError::InvalidLogFormat {
                value: config.log_format.clone(),
            });
        }

        if !config.metrics_enabled {
            return;
        }
        if !config.metrics_path.starts_with('/') {
            result.add_error(ConfigValidationError::InvalidPath {
                name: "observability.metrics_path".to_string(),
                value: config.metrics_path.clone(),
            });
        } else if Self::is_reserved_path(&config.metrics_path, &server.api_prefix) {
            result.add_error(ConfigValidationError::ReservedPath {
                name: "observability.metrics_path".to_string(),
                value: config.metrics_path.clone(),
            });
        }
    }

    /// Whether `path` would overlap a route the REST router already mounts.
    fn is_reserved_path(path: &str, api_prefix: &str) -> bool {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        let under = |prefix: &str| {
            let prefix = prefix.trim_end_matches('/');
            prefix.is_empty()
                || path == prefix
                || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
        };

        Self::RESERVED_ROUTES.contains(&path)
            || Self::RESERVED_PREFIXES.iter().any(|prefix| under(prefix))
            || under(api_prefix)
    }

    fn check_url(url_type: &str, raw: &str, schemes: &[&str], result: &mut ValidationResult) {
        match Url::parse(raw) {
            Ok(url) if schemes.contains(&url.scheme()) => {}
            Ok(url) => result.add_error(ConfigValidationError::InvalidUrl {
                url_type: url_type.to_string(),
                message: format!(
                    "unsupported scheme '{}' (expected {})",
                    url.scheme(),
                    schemes.join(" or ")
                ),
            }),
            Err(e) => result.add_error(ConfigValidationError::InvalidUrl {
                url_type: url_type.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
