//! # Book Model
//!
//! Catalog entry for a single book.
//!
//! ## Database Schema
//!
//! Maps to the `books` table:
//! - `id`: Primary key (BIGSERIAL), store-assigned and never reused
//! - `title`: Non-empty text
//! - `author`: Non-empty text, indexed for equality filtering
//! - `publication_year`: INTEGER, indexed for equality filtering
//! - `created_at` / `updated_at`: TIMESTAMPTZ maintained by the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted book.
///
/// `id` is assigned by the entity store on creation and is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable book fields, used both for creation and for full-replacement updates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>, publication_year: i32) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            publication_year,
        }
    }
}

impl Book {
    /// Build a fresh record from validated input
    pub fn from_new(id: i64, new_book: NewBook, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new_book.title,
            author: new_book.author,
            publication_year: new_book.publication_year,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every mutable field, keeping identity and creation time
    pub fn apply(&mut self, fields: NewBook, now: DateTime<Utc>) {
        self.title = fields.title;
        self.author = fields.author;
        self.publication_year = fields.publication_year;
        self.updated_at = now;
    }
}

/// Optional equality filters for book listings, combined with logical AND.
///
/// An empty filter matches every book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFilter {
    pub author: Option<String>,
    pub publication_year: Option<i32>,
}

impl BookFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_publication_year(mut self, year: i32) -> Self {
        self.publication_year = Some(year);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.publication_year.is_none()
    }

    pub fn matches(&self, book: &Book) -> bool {
        let author_ok = self
            .author
            .as_deref()
            .map_or(true, |author| book.author == author);
        let year_ok = self
            .publication_year
            .map_or(true, |year| book.publication_year == year);
        author_ok && year_ok
    }
}
