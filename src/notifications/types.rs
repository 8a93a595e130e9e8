use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Review;

/// Immutable job payload handed from the catalog service to the notification worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewNotification {
    /// Correlation id for tracing a single confirmation across logs
    pub notification_id: Uuid,
    pub review_id: i64,
    pub book_id: i64,
    pub rating: i32,
    pub text: String,
    pub submitted_at: DateTime<Utc>,
}

impl ReviewNotification {
    pub fn from_review(review: &Review) -> Self {
        Self {
            notification_id: Uuid::new_v4(),
            review_id: review.id,
            book_id: review.book_id,
            rating: review.rating,
            text: review.text.clone(),
            submitted_at: review.created_at,
        }
    }
}

/// Error types for confirmation delivery
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Confirmation delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Notification channel is closed")]
    ChannelClosed,

    #[error("Confirmation sender panicked")]
    SenderPanicked,
}
