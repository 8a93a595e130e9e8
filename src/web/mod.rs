//! # Catalog Web API
//!
//! REST endpoints for books and reviews. Handlers decode requests, call the
//! [`CatalogService`](crate::services::CatalogService) and map its errors onto
//! HTTP statuses through [`ApiError`].

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use errors::{ApiError, ApiResult};
pub use state::AppState;

/// Create the web application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let app = Router::new()
        .merge(routes::health_routes())
        .merge(routes::book_routes())
        .merge(routes::review_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Catalog web application created with all routes");
    app
}
