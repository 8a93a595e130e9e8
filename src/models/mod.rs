//! # Catalog Models
//!
//! Persisted records and the input types used to create, replace and filter them.

pub mod book;
pub mod review;

// Re-export core models for easy access
pub use book::{Book, BookFilter, NewBook};
pub use review::{NewReview, Review};
