//! # Catalog Errors
//!
//! Error taxonomy shared by the validation layer, the entity store and the
//! catalog service. Every variant is a recoverable, per-request outcome; none
//! of them take the service down.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All validation failures found for one piece of input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortcut for a failure that concerns a single field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, message)],
        }
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true when any failure was recorded against `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected, otherwise the collected failures
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::ValidationFailed(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Entity kinds named in not-found errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Book,
    Review,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Book => write!(f, "Book"),
            EntityKind::Review => write!(f, "Review"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: i64 },

    /// A review referenced a book that does not exist
    #[error("Book {0} not found")]
    BookNotFound(i64),

    /// A book delete was refused because reviews still reference it
    #[error("Book {book_id} still has {review_count} review(s)")]
    HasDependents { book_id: i64, review_count: usize },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CatalogError {
    pub fn book_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: EntityKind::Book,
            id,
        }
    }

    pub fn review_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: EntityKind::Review,
            id,
        }
    }

    /// True for both `NotFound` and `BookNotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::NotFound { .. } | CatalogError::BookNotFound(_)
        )
    }
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        CatalogError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
