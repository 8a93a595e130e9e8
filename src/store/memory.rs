//! In-memory entity store
//!
//! Both collections live behind one `parking_lot::RwLock`, so reads run
//! concurrently and every write (including cross-record ones such as a
//! cascading book delete) is serialized. The lock is never held across an
//! await point.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

use super::EntityStore;
use crate::error::{CatalogError, Result};
use crate::models::{Book, BookFilter, NewBook, NewReview, Review};

#[derive(Debug)]
struct CatalogState {
    // BTreeMap over monotonically increasing ids gives insertion order for free
    books: BTreeMap<i64, Book>,
    reviews: BTreeMap<i64, Review>,
    next_book_id: i64,
    next_review_id: i64,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            books: BTreeMap::new(),
            reviews: BTreeMap::new(),
            next_book_id: 1,
            next_review_id: 1,
        }
    }
}

/// Process-lifetime store for books and reviews
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<CatalogState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn book_count(&self) -> usize {
        self.state.read().books.len()
    }

    pub fn review_count(&self) -> usize {
        self.state.read().reviews.len()
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn create_book(&self, book: NewBook) -> Result<Book> {
        let mut state = self.state.write();
        let id = state.next_book_id;
        state.next_book_id += 1;

        let record = Book::from_new(id, book, Utc::now());
        state.books.insert(id, record.clone());
        debug!(book_id = id, "Stored book");
        Ok(record)
    }

    async fn get_book(&self, id: i64) -> Result<Book> {
        self.state
            .read()
            .books
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::book_not_found(id))
    }

    async fn list_books(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        Ok(self
            .state
            .read()
            .books
            .values()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect())
    }

    async fn update_book(&self, id: i64, fields: NewBook) -> Result<Book> {
        let mut state = self.state.write();
        let book = state
            .books
            .get_mut(&id)
            .ok_or_else(|| CatalogError::book_not_found(id))?;
        book.apply(fields, Utc::now());
        Ok(book.clone())
    }

    async fn delete_book(&self, id: i64) -> Result<usize> {
        let mut state = self.state.write();
        if state.books.remove(&id).is_none() {
            return Err(CatalogError::book_not_found(id));
        }

        let before = state.reviews.len();
        state.reviews.retain(|_, review| review.book_id != id);
        let cascaded = before - state.reviews.len();

        debug!(book_id = id, cascaded_reviews = cascaded, "Removed book");
        Ok(cascaded)
    }

    async fn create_review(&self, book_id: i64, review: NewReview) -> Result<Review> {
        let mut state = self.state.write();
        if !state.books.contains_key(&book_id) {
            return Err(CatalogError::BookNotFound(book_id));
        }

        let id = state.next_review_id;
        state.next_review_id += 1;

        let record = Review::from_new(id, book_id, review, Utc::now());
        state.reviews.insert(id, record.clone());
        debug!(review_id = id, book_id = book_id, "Stored review");
        Ok(record)
    }

    async fn get_review(&self, id: i64) -> Result<Review> {
        self.state
            .read()
            .reviews
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::review_not_found(id))
    }

    async fn list_reviews(&self) -> Result<Vec<Review>> {
        Ok(self.state.read().reviews.values().cloned().collect())
    }

    async fn list_reviews_by_book(&self, book_id: i64) -> Result<Vec<Review>> {
        let state = self.state.read();
        if !state.books.contains_key(&book_id) {
            return Err(CatalogError::BookNotFound(book_id));
        }

        Ok(state
            .reviews
            .values()
            .filter(|review| review.book_id == book_id)
            .cloned()
            .collect())
    }

    async fn update_review(&self, id: i64, fields: NewReview) -> Result<Review> {
        let mut state = self.state.write();
        let review = state
            .reviews
            .get_mut(&id)
            .ok_or_else(|| CatalogError::review_not_found(id))?;
        review.apply(fields, Utc::now());
        Ok(review.clone())
    }

    async fn delete_review(&self, id: i64) -> Result<()> {
        self.state
            .write()
            .reviews
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CatalogError::review_not_found(id))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
