//! # Structured Logging Module
//!
//! Environment-aware structured logging. Production emits JSON lines, every
//! other environment emits human-readable output. `RUST_LOG` always wins over
//! the environment-derived level.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::ConfigManager;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging once per process
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = ConfigManager::detect_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));

        let console_layer = if environment == "production" {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(true)
                .boxed()
        };

        // A subscriber may already be installed, e.g. by a test harness
        if tracing_subscriber::registry()
            .with(console_layer.with_filter(filter))
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %environment,
            "Structured logging initialized"
        );
    });
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        "test" => "warn",
        _ => "debug",
    }
}

/// Log structured data for a catalog operation
pub fn log_catalog_operation(
    operation: &str,
    book_id: Option<i64>,
    review_id: Option<i64>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        book_id = book_id,
        review_id = review_id,
        status = %status,
        details = details,
        "CATALOG_OPERATION"
    );
}

/// Log structured data for a review confirmation attempt
pub fn log_notification_operation(
    notification_id: &str,
    review_id: i64,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        notification_id = %notification_id,
        review_id = review_id,
        status = %status,
        details = details,
        "NOTIFICATION_OPERATION"
    );
}
