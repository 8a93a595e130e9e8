//! # Web API Application State
//!
//! Shared state handed to every request handler.

use std::sync::Arc;

use crate::config::ConfigManager;
use crate::services::CatalogService;

/// Shared application state for the web API.
///
/// Cloned per request; the catalog service itself only holds `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub environment: Arc<str>,
}

impl AppState {
    pub fn new(catalog: CatalogService, environment: impl Into<Arc<str>>) -> Self {
        Self {
            catalog,
            environment: environment.into(),
        }
    }

    pub fn from_config(catalog: CatalogService, config: &ConfigManager) -> Self {
        Self::new(catalog, config.environment())
    }
}
