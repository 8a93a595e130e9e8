//! # Database Migration System
//!
//! Applies the schema migrations embedded in the binary and records each
//! applied version in `book_review_schema_migrations`.
//!
//! ## Concurrency Control
//!
//! Several processes may start against the same database at once. The runner
//! holds a PostgreSQL advisory lock for the whole run, so exactly one of them
//! applies outstanding migrations and the others find nothing left to do:
//!
//! ```sql
//! SELECT pg_advisory_lock(7305221983140619)
//! ```
//!
//! ## Naming
//!
//! Migration files live in `migrations/` as `YYYYMMDDHHMMSS_description.sql`.

use sqlx::{Connection, PgConnection, PgPool};
use std::collections::HashSet;
use tracing::info;

const LOCK_KEY: i64 = 7305221983140619;

/// Migrations compiled into the binary, in version order
const EMBEDDED_MIGRATIONS: &[(&str, &str)] = &[(
    "20240601000000_create_books_and_reviews",
    include_str!("../../migrations/20240601000000_create_books_and_reviews.sql"),
)];

/// Represents a single database migration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Version timestamp (YYYYMMDDHHMMSS format)
    pub version: String,
    /// Human-readable migration name
    pub name: String,
    pub sql: &'static str,
}

pub struct DatabaseMigrations;

impl DatabaseMigrations {
    /// Apply every outstanding migration
    pub async fn run_all(pool: &PgPool) -> Result<(), sqlx::Error> {
        let mut conn = pool.acquire().await?;

        sqlx::query("SELECT pg_advisory_lock($1)")
            .bind(LOCK_KEY)
            .execute(&mut *conn)
            .await?;

        let result = Self::run_outstanding(&mut conn).await;

        // Release even when a migration failed
        sqlx::query("SELECT pg_advisory_unlock($1)")
            .bind(LOCK_KEY)
            .execute(&mut *conn)
            .await?;

        result
    }

    /// Embedded migrations parsed into version and name
    pub fn embedded() -> Vec<Migration> {
        EMBEDDED_MIGRATIONS
            .iter()
            .filter_map(|(filename, sql)| {
                Self::parse_migration_filename(filename).map(|(version, name)| Migration {
                    version,
                    name,
                    sql: *sql,
                })
            })
            .collect()
    }

    async fn run_outstanding(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        Self::ensure_migration_table(conn).await?;
        let applied = Self::get_applied_migrations(conn).await?;

        for migration in Self::embedded() {
            if applied.contains(&migration.version) {
                continue;
            }

            info!(
                version = %migration.version,
                name = %migration.name,
                "Applying migration"
            );

            let mut tx = conn.begin().await?;
            sqlx::raw_sql(migration.sql).execute(&mut *tx).await?;
            sqlx::query("INSERT INTO book_review_schema_migrations (version) VALUES ($1)")
                .bind(&migration.version)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
        }

        Ok(())
    }

    /// Parse `YYYYMMDDHHMMSS_migration_name` into version and readable name
    fn parse_migration_filename(filename: &str) -> Option<(String, String)> {
        if filename.len() < 15 {
            return None;
        }

        let (version_part, name_part) = filename.split_at(14);
        if !version_part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let name = name_part
            .strip_prefix('_')
            .unwrap_or(name_part)
            .replace('_', " ");

        Some((version_part.to_string(), name))
    }

    async fn ensure_migration_table(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(
            r#"
            CREATE TABLE IF NOT EXISTS book_review_schema_migrations (
                version VARCHAR(14) PRIMARY KEY,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
        )
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    async fn get_applied_migrations(
        conn: &mut PgConnection,
    ) -> Result<HashSet<String>, sqlx::Error> {
        let versions: Vec<String> =
            sqlx::query_scalar("SELECT version FROM book_review_schema_migrations")
                .fetch_all(&mut *conn)
                .await?;

        Ok(versions.into_iter().collect())
    }
}
