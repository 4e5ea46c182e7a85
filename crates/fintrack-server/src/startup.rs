//! Server startup utilities.

use fintrack_config::{AppConfig, CacheBackend};
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    _______       __                  __
   / ____(_)___  / /__________ ______/ /__
  / /_  / / __ \/ __/ ___/ __ `/ ___/ //_/
 / __/ / / / / / /_/ /  / /_/ / /__/ ,<
/_/   /_/_/ /_/\__/_/   \__,_/\___/_/|_|
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let base = format!("http://{}", config.server.addr());
    info!("{}", separator);
    info!("REST API:  {}{}/transactions", base, config.server.api_prefix);
    info!("Health:    {}/health", base);
    info!("API Docs:  {}/swagger-ui", base);
    if config.observability.metrics_enabled {
        info!("Metrics:   {}{}", base, config.observability.metrics_path);
    }
    info!(
        "Cache:     {} (namespace '{}', ttl {}s)",
        cache_label(config),
        config.cache.namespace,
        config.cache.ttl_secs
    );
    info!("{}", separator);
}

fn cache_label(config: &AppConfig) -> &'static str {
    match config.cache.backend {
        CacheBackend::Memory => "memory",
        CacheBackend::Redis if config.redis.enabled => "redis",
        CacheBackend::Redis => "disabled",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut config = AppConfig::default();
        print_startup_info(&config);

        config.redis.enabled = false;
        config.observability.metrics_enabled = false;
        print_startup_info(&config);
    }

    #[test]
    fn test_cache_label() {
        let mut config = AppConfig::default();
        assert_eq!(cache_label(&config), "redis");
        config.redis.enabled = false;
        assert_eq!(cache_label(&config), "disabled");
        config.cache.backend = CacheBackend::Memory;
        assert_eq!(cache_label(&config), "memory");
    }
}
