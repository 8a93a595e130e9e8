//! Catalog Service
//!
//! Book and review operations: input is validated, the entity store does the
//! work, and a review confirmation is queued only after the store commits.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::constants::operations;
use crate::error::Result;
use crate::logging::log_catalog_operation;
use crate::models::{Book, BookFilter, NewBook, NewReview, Review};
use crate::notifications::ReviewNotifier;
use crate::store::EntityStore;
use crate::validation::{validate_new_book, validate_new_review};

/// Orchestrates book and review operations over an injected entity store.
///
/// Holds no per-request state and no cached records: every call round-trips
/// through the store, so one instance is shared by all concurrent requests.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn EntityStore>,
    notifier: ReviewNotifier,
}

/// Acknowledgement returned by delete operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub id: i64,
    /// Reviews removed together with a deleted book; always 0 for review deletes
    pub cascaded_reviews: usize,
}

impl CatalogService {
    pub fn new(store: Arc<dyn EntityStore>, notifier: ReviewNotifier) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &Arc<dyn EntityStore> {
        &self.store
    }

    #[instrument(skip(self, book), fields(author = %book.author))]
    pub async fn add_book(&self, book: NewBook) -> Result<Book> {
        validate_new_book(&book)?;

        let created = self.store.create_book(book).await?;
        log_catalog_operation(operations::ADD_BOOK, Some(created.id), None, "created", None);
        Ok(created)
    }

    pub async fn get_book(&self, id: i64) -> Result<Book> {
        debug!(operation = operations::GET_BOOK, book_id = id);
        self.store.get_book(id).await
    }

    /// Books matching the filter; no match is an empty list, not an error
    pub async fn list_books(&self, filter: BookFilter) -> Result<Vec<Book>> {
        let books = self.store.list_books(&filter).await?;
        debug!(
            operation = operations::LIST_BOOKS,
            author = ?filter.author,
            publication_year = ?filter.publication_year,
            count = books.len()
        );
        Ok(books)
    }

    /// Replace every mutable field of an existing book
    #[instrument(skip(self, fields))]
    pub async fn update_book(&self, id: i64, fields: NewBook) -> Result<Book> {
        validate_new_book(&fields)?;

        let updated = self.store.update_book(id, fields).await?;
        log_catalog_operation(operations::UPDATE_BOOK, Some(id), None, "updated", None);
        Ok(updated)
    }

    /// Delete a book together with all of its reviews
    #[instrument(skip(self))]
    pub async fn delete_book(&self, id: i64) -> Result<DeleteAck> {
        let cascaded_reviews = self.store.delete_book(id).await?;

        let details = format!("cascaded_reviews={cascaded_reviews}");
        log_catalog_operation(
            operations::DELETE_BOOK,
            Some(id),
            None,
            "deleted",
            Some(&details),
        );
        Ok(DeleteAck {
            id,
            cascaded_reviews,
        })
    }

    /// Persist a review for an existing book, then schedule its confirmation.
    ///
    /// The confirmation is queued only after the store returns the committed
    /// review and is never awaited here, so its outcome cannot affect the result.
    #[instrument(skip(self, review), fields(rating = review.rating))]
    pub async fn submit_review(&self, book_id: i64, review: NewReview) -> Result<Review> {
        validate_new_review(&review)?;

        let created = self.store.create_review(book_id, review).await?;

        let notification_id = self.notifier.notify(&created);
        let details = notification_id.map(|id| format!("notification_id={id}"));
        log_catalog_operation(
            operations::SUBMIT_REVIEW,
            Some(book_id),
            Some(created.id),
            "created",
            details.as_deref(),
        );
        Ok(created)
    }

    pub async fn get_review(&self, id: i64) -> Result<Review> {
        debug!(operation = operations::GET_REVIEW, review_id = id);
        self.store.get_review(id).await
    }

    /// Reviews of one book; `BookNotFound` when the book does not exist
    pub async fn list_reviews_for_book(&self, book_id: i64) -> Result<Vec<Review>> {
        let reviews = self.store.list_reviews_by_book(book_id).await?;
        debug!(
            operation = operations::LIST_REVIEWS_FOR_BOOK,
            book_id = book_id,
            count = reviews.len()
        );
        Ok(reviews)
    }

    #[instrument(skip(self, fields))]
    pub async fn update_review(&self, id: i64, fields: NewReview) -> Result<Review> {
        validate_new_review(&fields)?;

        let updated = self.store.update_review(id, fields).await?;
        log_catalog_operation(
            operations::UPDATE_REVIEW,
            Some(updated.book_id),
            Some(id),
            "updated",
            None,
        );
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_review(&self, id: i64) -> Result<DeleteAck> {
        self.store.delete_review(id).await?;
        log_catalog_operation(operations::DELETE_REVIEW, None, Some(id), "deleted", None);
        Ok(DeleteAck {
            id,
            cascaded_reviews: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::store::InMemoryStore;

    fn service() -> (CatalogService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (
            CatalogService::new(store.clone(), ReviewNotifier::disabled()),
            store,
        )
    }

    #[tokio::test]
    async fn test_invalid_book_never_reaches_store() {
        let (service, store) = service();
        let err = service
            .add_book(NewBook::new("", "Herbert", 1965))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::ValidationFailed(_)));
        assert_eq!(store.book_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_update_leaves_book_untouched() {
        let (service, _) = service();
        let book = service.add_book(NewBook::new("Dune", "Herbert", 1965)).await.unwrap();

        let err = service
            .update_book(book.id, NewBook::new("Dune", "", 1965))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::ValidationFailed(_)));
        assert_eq!(service.get_book(book.id).await.unwrap(), book);
    }

    #[tokio::test]
    async fn test_out_of_range_rating_rejected_before_lookup() {
        let (service, store) = service();
        let err = service
            .submit_review(999, NewReview::new("Great", 0))
            .await
            .unwrap_err();

        // Validation runs before the book lookup
        assert!(matches!(err, CatalogError::ValidationFailed(_)));
        assert_eq!(store.review_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_review_ack() {
        let (service, _) = service();
        let book = service.add_book(NewBook::new("Dune", "Herbert", 1965)).await.unwrap();
        let review = service
            .submit_review(book.id, NewReview::new("Great", 5))
            .await
            .unwrap();

        let ack = service.delete_review(review.id).await.unwrap();
        assert_eq!(ack, DeleteAck { id: review.id, cascaded_reviews: 0 });
        assert!(service.get_review(review.id).await.unwrap_err().is_not_found());
    }
}
