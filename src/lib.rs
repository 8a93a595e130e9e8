#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Book Review Core
//!
//! Catalog service for books and their reviews, with referential integrity
//! between the two and asynchronous review confirmations.
//!
//! ## Architecture
//!
//! Requests enter through the [`web`] layer, which decodes them and calls the
//! [`services::CatalogService`]. The service validates input with
//! [`validation`], persists through an injected [`store::EntityStore`] and,
//! after a review is committed, hands a confirmation job to the
//! [`notifications`] worker without waiting on it.
//!
//! ## Module Organization
//!
//! - [`models`] - `Book`, `Review` and their input/filter types
//! - [`validation`] - field rules for new and updated entities
//! - [`store`] - storage contract with in-memory and PostgreSQL backends
//! - [`database`] - PostgreSQL pool and embedded migrations
//! - [`services`] - catalog operations and integrity enforcement
//! - [`notifications`] - background review confirmation worker
//! - [`web`] - axum routes, handlers and HTTP error mapping
//! - [`config`] - layered configuration loading
//! - [`logging`] - structured `tracing` setup
//! - [`error`] - catalog error taxonomy
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use book_review_core::models::{NewBook, NewReview};
//! use book_review_core::notifications::ReviewNotifier;
//! use book_review_core::services::CatalogService;
//! use book_review_core::store::InMemoryStore;
//!
//! # async fn example() -> book_review_core::Result<()> {
//! let catalog = CatalogService::new(Arc::new(InMemoryStore::new()), ReviewNotifier::disabled());
//!
//! let book = catalog.add_book(NewBook::new("Dune", "Frank Herbert", 1965)).await?;
//! catalog.submit_review(book.id, NewReview::new("A classic", 5)).await?;
//!
//! let reviews = catalog.list_reviews_for_book(book.id).await?;
//! assert_eq!(reviews.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib                # Unit tests
//! cargo test                      # All tests
//! cargo test -- --ignored         # PostgreSQL store tests (needs DATABASE_URL)
//! ```

pub mod config;
pub mod constants;
#[cfg(feature = "postgres")]
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod notifications;
pub mod services;
pub mod store;
pub mod test_utils;
pub mod validation;
pub mod web;

pub use config::{AppConfig, ConfigManager, DatabaseConfig, StorageBackend};
pub use constants::{MAX_RATING, MIN_RATING};
pub use error::{CatalogError, EntityKind, FieldError, Result, ValidationErrors};
pub use models::{Book, BookFilter, NewBook, NewReview, Review};
pub use services::{CatalogService, DeleteAck};
pub use store::{EntityStore, InMemoryStore};
