//! # Web API Request Handlers
//!
//! HTTP request handlers organized by resource.

pub mod books;
pub mod health;
pub mod reviews;
