//! Shared helpers for the integration suites

#![allow(dead_code)]

pub mod strategies;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use book_review_core::error::{CatalogError, Result};
use book_review_core::models::{Book, BookFilter, NewBook, NewReview, Review};
use book_review_core::notifications::{ConfirmationSender, NotificationError, ReviewNotification};
use book_review_core::store::EntityStore;

/// Records every confirmation it is handed, noting whether the review was
/// already readable from the store at delivery time.
pub struct RecordingSender {
    store: Arc<dyn EntityStore>,
    deliveries: Mutex<Vec<RecordedDelivery>>,
}

#[derive(Debug, Clone)]
pub struct RecordedDelivery {
    pub notification: ReviewNotification,
    pub review_visible: bool,
}

impl RecordingSender {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            deliveries: Mutex::new(Vec::new()),
        }
    }

    pub fn deliveries(&self) -> Vec<RecordedDelivery> {
        self.deliveries.lock().clone()
    }
}

#[async_trait]
impl ConfirmationSender for RecordingSender {
    async fn send_confirmation(
        &self,
        notification: &ReviewNotification,
    ) -> std::result::Result<(), NotificationError> {
        let review_visible = self.store.get_review(notification.review_id).await.is_ok();
        self.deliveries.lock().push(RecordedDelivery {
            notification: notification.clone(),
            review_visible,
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Always fails to deliver
pub struct FailingSender;

#[async_trait]
impl ConfirmationSender for FailingSender {
    async fn send_confirmation(
        &self,
        _notification: &ReviewNotification,
    ) -> std::result::Result<(), NotificationError> {
        Err(NotificationError::DeliveryFailed("smtp unreachable".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Store whose backing resource is unreachable
pub struct UnavailableStore;

impl UnavailableStore {
    fn fault<T>() -> Result<T> {
        Err(CatalogError::Storage(
            "connection refused: postgresql://catalog:s3cret@db/catalog".to_string(),
        ))
    }
}

#[async_trait]
impl EntityStore for UnavailableStore {
    async fn create_book(&self, _book: NewBook) -> Result<Book> {
        Self::fault()
    }

    async fn get_book(&self, _id: i64) -> Result<Book> {
        Self::fault()
    }

    async fn list_books(&self, _filter: &BookFilter) -> Result<Vec<Book>> {
        Self::fault()
    }

    async fn update_book(&self, _id: i64, _fields: NewBook) -> Result<Book> {
        Self::fault()
    }

    async fn delete_book(&self, _id: i64) -> Result<usize> {
        Self::fault()
    }

    async fn create_review(&self, _book_id: i64, _review: NewReview) -> Result<Review> {
        Self::fault()
    }

    async fn get_review(&self, _id: i64) -> Result<Review> {
        Self::fault()
    }

    async fn list_reviews(&self) -> Result<Vec<Review>> {
        Self::fault()
    }

    async fn list_reviews_by_book(&self, _book_id: i64) -> Result<Vec<Review>> {
        Self::fault()
    }

    async fn update_review(&self, _id: i64, _fields: NewReview) -> Result<Review> {
        Self::fault()
    }

    async fn delete_review(&self, _id: i64) -> Result<()> {
        Self::fault()
    }

    async fn health_check(&self) -> Result<()> {
        Self::fault()
    }

    fn backend_name(&self) -> &'static str {
        "unavailable"
    }
}
