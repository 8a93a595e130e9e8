//! # Entity Store
//!
//! The persistence boundary for `Book` and `Review` records.
//!
//! ## Overview
//!
//! The catalog service talks to storage only through the [`EntityStore`]
//! trait, injected at startup as an `Arc<dyn EntityStore>`. Two
//! implementations ship with the crate:
//!
//! - [`memory::InMemoryStore`] - process-lifetime storage behind a single lock
//! - [`postgres::PostgresStore`] - durable storage on a SQLx connection pool
//!
//! ## Contract
//!
//! - Ids are assigned by the store, unique per entity type and never reused.
//! - `create_review` checks that the book exists in the same critical section
//!   (or transaction) as the insert, so a concurrent `delete_book` can never
//!   leave a review pointing at a deleted book.
//! - `delete_book` cascades: the book and all of its reviews are removed
//!   together and the number of removed reviews is returned.
//! - `list_reviews_by_book` reports `BookNotFound` for an unknown book and an
//!   empty list for a known book without reviews.
//! - Updates replace every mutable field at once; readers never observe a
//!   half-written record.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Book, BookFilter, NewBook, NewReview, Review};

pub use memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Persist a new book and return it with its assigned id
    async fn create_book(&self, book: NewBook) -> Result<Book>;

    async fn get_book(&self, id: i64) -> Result<Book>;

    /// Books matching `filter`, in insertion order
    async fn list_books(&self, filter: &BookFilter) -> Result<Vec<Book>>;

    async fn update_book(&self, id: i64, fields: NewBook) -> Result<Book>;

    /// Remove a book and cascade to its reviews, returning the number of reviews removed
    async fn delete_book(&self, id: i64) -> Result<usize>;

    /// Persist a review against an existing book
    async fn create_review(&self, book_id: i64, review: NewReview) -> Result<Review>;

    async fn get_review(&self, id: i64) -> Result<Review>;

    /// Every review, in insertion order
    async fn list_reviews(&self) -> Result<Vec<Review>>;

    async fn list_reviews_by_book(&self, book_id: i64) -> Result<Vec<Review>>;

    async fn update_review(&self, id: i64, fields: NewReview) -> Result<Review>;

    async fn delete_review(&self, id: i64) -> Result<()>;

    /// Verify the store can serve requests
    async fn health_check(&self) -> Result<()>;

    /// Short name used in logs and health output
    fn backend_name(&self) -> &'static str;
}
