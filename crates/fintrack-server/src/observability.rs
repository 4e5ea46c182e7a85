//! Logging and metrics setup.

use axum::{routing::get, Router};
use fintrack_config::ObservabilityConfig;
use fintrack_core::{FintrackError, FintrackResult};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &ObservabilityConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},fintrack=debug,tower_http=debug",
            config.log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Installs the Prometheus recorder and registers metric descriptions.
pub fn install_metrics_recorder() -> FintrackResult<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| FintrackError::Configuration(format!("Failed to install metrics recorder: {}", e)))?;

    fintrack_service::metrics::register_metrics();
    info!("Prometheus metrics recorder installed");
    Ok(handle)
}

/// Adds the scrape endpoint at `path`.
pub fn with_metrics_route(router: Router, path: &str, handle: PrometheusHandle) -> Router {
    router.route(
        path,
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_metrics_route_renders_handle() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let router = with_metrics_route(Router::new(), "/metrics", handle);

        let response = router
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty() || std::str::from_utf8(&bytes).is_ok());
    }
}
