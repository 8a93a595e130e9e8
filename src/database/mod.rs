//! # Database Operations
//!
//! PostgreSQL plumbing for the durable entity store.
//!
//! - [`connection`] - pool construction from [`DatabaseConfig`](crate::config::DatabaseConfig)
//! - [`migrations`] - embedded schema migrations guarded by an advisory lock
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use book_review_core::config::DatabaseConfig;
//! use book_review_core::database::{DatabaseConnection, DatabaseMigrations};
//! use book_review_core::store::PostgresStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = DatabaseConnection::new(&DatabaseConfig::default()).await?;
//! DatabaseMigrations::run_all(db.pool()).await?;
//! let store = PostgresStore::new(db.pool().clone());
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod migrations;

pub use connection::DatabaseConnection;
pub use migrations::DatabaseMigrations;
