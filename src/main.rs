//! LicenseGate server: license-gated, quota-metered text generation.
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use licensegate_api::{AppState, build_app};
use licensegate_core::config::AppConfig;
use licensegate_core::error::AppError;
use licensegate_core::traits::{Clock, SystemClock};
use licensegate_database::LedgerManager;
use licensegate_service::{LicenseRegistry, OpenAiGenerator, TextGenerator};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from the config directory and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_dir =
        std::env::var("LICENSEGATE_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let env = std::env::var("LICENSEGATE_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load_from(&config_dir, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting LicenseGate v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Ledger store ─────────────────────────────────────
    create_database_directory(&config).await?;

    tracing::info!(
        "Opening ledger store (provider: {})...",
        config.database.provider
    );
    let ledger = LedgerManager::open(&config.database).await?;
    let store = ledger.store();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());

    // ── Step 2: Default licenses ─────────────────────────────────
    if config.license.seed_on_startup {
        let registry = LicenseRegistry::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            config.license.clone(),
        );
        registry.seed_defaults(&config.license.seed).await?;
    }

    // ── Step 3: Generation backend ───────────────────────────────
    if config.generation.api_key.is_empty() {
        tracing::warn!("No generation API key configured; generation requests will fail");
    }
    let generator: Arc<dyn TextGenerator> =
        Arc::new(OpenAiGenerator::new(config.generation.clone())?);

    // ── Step 4: HTTP server ──────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let cors = config.server.cors.clone();

    let state = AppState::new(config, store, clock, generator);
    let app = build_app(state, &cors);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("LicenseGate server listening on {}", addr);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let mut server = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await
    });

    // ── Step 5: Graceful shutdown ────────────────────────────────
    let result = tokio::select! {
        joined = &mut server => server_outcome(joined),
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
            match tokio::time::timeout(grace, &mut server).await {
                Ok(joined) => server_outcome(joined),
                Err(_) => {
                    tracing::warn!(
                        grace_seconds = grace.as_secs(),
                        "Open connections outlived the grace period"
                    );
                    server.abort();
                    Ok(())
                }
            }
        }
    };

    ledger.close().await;
    tracing::info!("LicenseGate server shut down");
    result
}

fn server_outcome(
    joined: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), AppError> {
    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(AppError::internal(format!("Server error: {}", e))),
        Err(e) => Err(AppError::internal(format!("Server task failed: {}", e))),
    }
}

/// Create the directory holding the SQLite database file
async fn create_database_directory(config: &AppConfig) -> Result<(), AppError> {
    if config.database.provider != "sqlite" {
        return Ok(());
    }
    let Some(parent) = config
        .database
        .sqlite_file_path()
        .and_then(|path| Path::new(path).parent())
        .filter(|dir| !dir.as_os_str().is_empty())
    else {
        return Ok(());
    };

    tokio::fs::create_dir_all(parent).await.map_err(|e| {
        AppError::internal(format!("Failed to create dir '{}': {}", parent.display(), e))
    })
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
