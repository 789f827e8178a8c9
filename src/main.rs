//! AuthGate Server: token-based authentication service.
//!
//! Main entry point that loads configuration, wires the crates together
//! and serves HTTP until interrupted.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use authgate_api::{AppState, build_app, serve};
use authgate_auth::SessionManager;
use authgate_core::config::{AppConfig, LoggingConfig};
use authgate_core::error::AppError;
use authgate_core::traits::TokenStore;
use authgate_database::{DirectoryManager, UserDirectory};
use authgate_store::TokenStoreManager;

#[tokio::main]
async fn main() {
    let env = std::env::var("AUTHGATE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);
    info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        error!(error = %e, "Server error");
        eprintln!("AuthGate failed: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing. `RUST_LOG` takes precedence over `logging.level`.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    info!(version = env!("CARGO_PKG_VERSION"), "Starting AuthGate");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let store_manager = TokenStoreManager::new(&config.store, shutdown_rx).await?;
    info!(backend = store_manager.backend(), "Token store ready");
    let store: Arc<dyn TokenStore> = store_manager.store();

    let directory = DirectoryManager::new(&config.database).await?;
    let users: Arc<dyn UserDirectory> = directory.directory();

    let session_manager =
        SessionManager::from_config(Arc::clone(&users), Arc::clone(&store), &config.auth)?;

    let address = config.server.bind_address();
    let app = build_app(AppState::new(config, session_manager, users, store));

    serve(app, &address, async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    })
    .await?;

    directory.close().await;
    info!("AuthGate stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
