//! Catalog Web API Routes
//!
//! Route definitions grouped by resource.

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::{handlers, state::AppState};

/// Liveness and readiness probes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::basic_health))
        .route("/ready", get(handlers::health::readiness_probe))
}

/// Book collection and per-book review routes
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/books",
            post(handlers::books::create_book).get(handlers::books::list_books),
        )
        .route(
            "/books/:book_id",
            get(handlers::books::get_book)
                .put(handlers::books::update_book)
                .delete(handlers::books::delete_book),
        )
        .route(
            "/books/:book_id/reviews",
            post(handlers::reviews::submit_review).get(handlers::reviews::list_reviews_for_book),
        )
}

/// Routes addressing a single review by id
pub fn review_routes() -> Router<AppState> {
    Router::new().route(
        "/reviews/:review_id",
        get(handlers::reviews::get_review)
            .put(handlers::reviews::update_review)
            .delete(handlers::reviews::delete_review),
    )
}
