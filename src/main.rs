use std::sync::Arc;
use std::time::Duration;

use car_rental_booking::api;
use car_rental_booking::catalog::Catalog;
use car_rental_booking::config::{Config, StorageBackend};
use car_rental_booking::engine::booking::reconcile;
use car_rental_booking::engine::sweeper::run_order_sweeper;
use car_rental_booking::error::AppError;
use car_rental_booking::state::AppState;
use car_rental_booking::store::{JsonFileStore, MemoryStore, RecordStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let store: Arc<dyn RecordStore> = match config.storage_backend {
        StorageBackend::File => Arc::new(JsonFileStore::open(config.data_dir.clone())?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::seeded()?,
    };
    tracing::info!(
        vehicles = catalog.list_vehicles().len(),
        backend = ?config.storage_backend,
        "catalog loaded"
    );

    let shared_state = Arc::new(AppState::new(store, catalog, config.event_buffer_size));

    let orphans = reconcile(&shared_state).await?;
    if !orphans.is_empty() {
        tracing::warn!(count = orphans.len(), "removed temporary orders left by interrupted confirmations");
    }

    if config.sweep_interval_secs > 0 {
        tokio::spawn(run_order_sweeper(
            shared_state.clone(),
            Duration::from_secs(config.sweep_interval_secs),
            config.order_ttl,
        ));
    }

    let app = api::rest::router(shared_state);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
