//! Printsrv server: durable print queue with background retry
//!
//! Main entry point that wires the queue store, the network printer, and
//! the retry reconciler together, then runs until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use printsrv_core::config::AppConfig;
use printsrv_core::error::AppError;
use printsrv_database::{DatabasePool, JobStore};
use printsrv_printer::NetworkPrinter;
use printsrv_worker::{Reconciler, ReconcilerRunner};

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

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("PRINTSRV_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("PRINTSRV_ENV").ok();

    AppConfig::load(&config_path, env.as_deref())
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
    tracing::info!("Starting printsrv v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Queue store ──────────────────────────────────────
    let db_pool = DatabasePool::connect(&config.database).await?;
    let store = Arc::new(JobStore::new(db_pool.clone()));
    store.initialize().await?;

    let pending = store.count_incomplete().await?;
    tracing::info!("Queue store ready ({} undelivered entries)", pending);

    // ── Step 2: Output device ────────────────────────────────────
    let printer = Arc::new(NetworkPrinter::new(&config.printer));
    tracing::info!("Printer configured at {}", printer.address());

    // ── Step 3: Retry reconciler ─────────────────────────────────
    let (cancel_tx, cancel_rx) = watch::channel(false);

    let runner_handle = if config.reconciler.enabled {
        let reconciler = Arc::new(Reconciler::from_config(
            Arc::clone(&store),
            printer,
            &config.reconciler,
        ));
        let runner = ReconcilerRunner::new(
            reconciler,
            Duration::from_secs(config.reconciler.interval_seconds),
        );
        Some(tokio::spawn(async move { runner.run(cancel_rx).await }))
    } else {
        tracing::warn!("Reconciler disabled; undelivered jobs will not be retried");
        None
    };

    // ── Step 4: Wait for shutdown ────────────────────────────────
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for shutdown signal: {}", e)))?;
    tracing::info!("Shutdown signal received");

    let _ = cancel_tx.send(true);
    if let Some(handle) = runner_handle {
        if let Err(e) = handle.await {
            tracing::error!("Reconciler task panicked: {}", e);
        }
    }

    db_pool.close().await;
    tracing::info!("printsrv shut down complete");
    Ok(())
}
