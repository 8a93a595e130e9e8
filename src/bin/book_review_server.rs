//! Book Review Server Binary
//!
//! Loads configuration, builds the configured entity store, starts the review
//! confirmation worker and serves the catalog HTTP API until Ctrl-C.

use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use book_review_core::config::{AppConfig, ConfigManager, StorageBackend};
use book_review_core::database::{DatabaseConnection, DatabaseMigrations};
use book_review_core::logging::init_structured_logging;
use book_review_core::notifications::{
    NotificationWorker, NotificationWorkerHandle, ReviewNotifier, SimulatedEmailSender,
};
use book_review_core::services::CatalogService;
use book_review_core::store::{EntityStore, InMemoryStore, PostgresStore};
use book_review_core::web::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_structured_logging();

    let config_manager = ConfigManager::load().context("loading configuration")?;
    let config = config_manager.config();
    let bind_address = config.bind_address()?;

    info!(environment = config_manager.environment(), "Starting book review server");

    let (store, db) = build_store(config).await?;
    let (notifier, worker) = start_notifications(config);

    let catalog = CatalogService::new(store, notifier);
    let app = create_app(AppState::from_config(catalog, &config_manager));

    let listener = TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("binding {bind_address}"))?;
    info!(address = %bind_address, "Catalog API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving catalog API")?;

    // The router (and every notifier clone it held) is gone; drain what is queued
    if let Some(worker) = worker {
        let stats = worker.shutdown().await;
        info!(
            delivered = stats.delivered,
            failed = stats.failed,
            "Notification worker drained"
        );
    }

    if let Some(db) = db {
        db.close().await;
    }

    info!("Book review server stopped");
    Ok(())
}

/// The connection is returned alongside the store so its pool can be closed
/// once the server and worker are done with it.
async fn build_store(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn EntityStore>, Option<DatabaseConnection>)> {
    match config.database.backend {
        StorageBackend::Memory => {
            info!("Using in-memory entity store");
            let store: Arc<dyn EntityStore> = Arc::new(InMemoryStore::new());
            Ok((store, None))
        }
        StorageBackend::Postgres => {
            let db = DatabaseConnection::new(&config.database)
                .await
                .context("connecting to PostgreSQL")?;
            DatabaseMigrations::run_all(db.pool())
                .await
                .context("running database migrations")?;
            info!("Using PostgreSQL entity store");
            let store: Arc<dyn EntityStore> = Arc::new(PostgresStore::new(db.pool().clone()));
            Ok((store, Some(db)))
        }
    }
}

fn start_notifications(config: &AppConfig) -> (ReviewNotifier, Option<NotificationWorkerHandle>) {
    if !config.notifications.enabled {
        info!("Review confirmations disabled");
        return (ReviewNotifier::disabled(), None);
    }

    let sender = Arc::new(SimulatedEmailSender::new(
        config.notifications.sender_address.clone(),
    ));
    let (notifier, handle) = NotificationWorker::spawn(sender);
    (notifier, Some(handle))
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
