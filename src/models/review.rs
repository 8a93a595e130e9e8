//! # Review Model
//!
//! Reader feedback attached to a book.
//!
//! Maps to the `reviews` table. `book_id` is the only cross-reference between
//! the two collections; a review never holds a live reference to its book.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub book_id: i64,
    pub text: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable review fields, used for submission and full-replacement updates.
///
/// The owning book comes from the request path and cannot be changed by an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    pub text: String,
    pub rating: i32,
}

impl NewReview {
    pub fn new(text: impl Into<String>, rating: i32) -> Self {
        Self {
            text: text.into(),
            rating,
        }
    }
}

impl Review {
    pub fn from_new(id: i64, book_id: i64, new_review: NewReview, now: DateTime<Utc>) -> Self {
        Self {
            id,
            book_id,
            text: new_review.text,
            rating: new_review.rating,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, fields: NewReview, now: DateTime<Utc>) {
        self.text = fields.text;
        self.rating = fields.rating;
        self.updated_at = now;
    }
}
