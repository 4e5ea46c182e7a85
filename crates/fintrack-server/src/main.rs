//! # Fintrack Server
//!
//! Main entry point: loads configuration, wires the application module, and
//! serves the transactions API until Ctrl+C or SIGTERM.

use fintrack_config::{AppConfig, ConfigLoader};
use fintrack_core::{FintrackError, FintrackResult};
use fintrack_rest::create_router;
use fintrack_server::{
    di::build_app_module,
    observability::{init_logging, install_metrics_recorder, with_metrics_route},
    startup::{print_banner, print_startup_info},
};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.get().await,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);
    print_banner();

    info!("Starting Fintrack Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> FintrackResult<()> {
    let module = build_app_module(&config).await?;

    let mut router = create_router(module.app_state(), &config.server);

    if config.observability.metrics_enabled {
        let handle = install_metrics_recorder()?;
        router = with_metrics_route(router, &config.observability.metrics_path, handle);
    }

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FintrackError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    print_startup_info(&config);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FintrackError::Internal(format!("REST server error: {}", e)));

    module.shutdown().await;

    served?;
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
