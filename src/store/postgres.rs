//! PostgreSQL entity store
//!
//! Every operation borrows a connection from the pool (or opens a
//! transaction) for its own duration only; the connection goes back to the
//! pool on every exit path when the guard is dropped, and an uncommitted
//! transaction rolls back on drop.
//!
//! Referential integrity is enforced twice: the `reviews.book_id` foreign key
//! (`ON DELETE CASCADE`) and explicit row locks. `create_review` takes a
//! `FOR SHARE` lock on the parent book while `delete_book` takes `FOR UPDATE`,
//! so a submission racing a delete either commits first (and is cascaded) or
//! observes the book as missing.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::EntityStore;
use crate::error::{CatalogError, Result};
use crate::models::{Book, BookFilter, NewBook, NewReview, Review};

const BOOK_COLUMNS: &str = "id, title, author, publication_year, created_at, updated_at";
const REVIEW_COLUMNS: &str = "id, book_id, text, rating, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl EntityStore for PostgresStore {
    async fn create_book(&self, book: NewBook) -> Result<Book> {
        let sql = format!(
            "INSERT INTO books (title, author, publication_year, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) \
             RETURNING {BOOK_COLUMNS}"
        );
        let record = sqlx::query_as::<_, Book>(&sql)
            .bind(&book.title)
            .bind(&book.author)
            .bind(book.publication_year)
            .fetch_one(&self.pool)
            .await?;

        debug!(book_id = record.id, "Stored book");
        Ok(record)
    }

    async fn get_book(&self, id: i64) -> Result<Book> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1");
        sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::book_not_found(id))
    }

    async fn list_books(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        let sql = format!(
            "SELECT {BOOK_COLUMNS} FROM books \
             WHERE ($1::TEXT IS NULL OR author = $1) \
               AND ($2::INTEGER IS NULL OR publication_year = $2) \
             ORDER BY id"
        );
        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(filter.author.as_deref())
            .bind(filter.publication_year)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn update_book(&self, id: i64, fields: NewBook) -> Result<Book> {
        let sql = format!(
            "UPDATE books \
             SET title = $2, author = $3, publication_year = $4, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {BOOK_COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .bind(&fields.title)
            .bind(&fields.author)
            .bind(fields.publication_year)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::book_not_found(id))
    }

    async fn delete_book(&self, id: i64) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(CatalogError::book_not_found(id));
        }

        let cascaded = sqlx::query("DELETE FROM reviews WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(book_id = id, cascaded_reviews = cascaded, "Removed book");
        Ok(cascaded as usize)
    }

    async fn create_review(&self, book_id: i64, review: NewReview) -> Result<Review> {
        let mut tx = self.pool.begin().await?;

        let parent: Option<i64> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR SHARE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?;
        if parent.is_none() {
            return Err(CatalogError::BookNotFound(book_id));
        }

        let sql = format!(
            "INSERT INTO reviews (book_id, text, rating, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) \
             RETURNING {REVIEW_COLUMNS}"
        );
        let record = sqlx::query_as::<_, Review>(&sql)
            .bind(book_id)
            .bind(&review.text)
            .bind(review.rating)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(review_id = record.id, book_id = book_id, "Stored review");
        Ok(record)
    }

    async fn get_review(&self, id: i64) -> Result<Review> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::review_not_found(id))
    }

    async fn list_reviews(&self) -> Result<Vec<Review>> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY id");
        let reviews = sqlx::query_as::<_, Review>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(reviews)
    }

    async fn list_reviews_by_book(&self, book_id: i64) -> Result<Vec<Review>> {
        let mut tx = self.pool.begin().await?;

        let parent: Option<i64> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR SHARE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?;
        if parent.is_none() {
            return Err(CatalogError::BookNotFound(book_id));
        }

        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE book_id = $1 ORDER BY id");
        let reviews = sqlx::query_as::<_, Review>(&sql)
            .bind(book_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(reviews)
    }

    async fn update_review(&self, id: i64, fields: NewReview) -> Result<Review> {
        let sql = format!(
            "UPDATE reviews \
             SET text = $2, rating = $3, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {REVIEW_COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .bind(&fields.text)
            .bind(fields.rating)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CatalogError::review_not_found(id))
    }

    async fn delete_review(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::review_not_found(id));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
