//! PostgreSQL implementation of the URL mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::UrlMappingRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct UrlMappingRow {
    id: i64,
    original_url: String,
    short_code: Option<String>,
    created_at: DateTime<Utc>,
    click_count: i64,
    expires_at: Option<DateTime<Utc>>,
}

impl From<UrlMappingRow> for UrlMapping {
    fn from(row: UrlMappingRow) -> Self {
        Self {
            id: row.id,
            original_url: row.original_url,
            short_code: row.short_code,
            created_at: row.created_at,
            click_count: row.click_count,
            expires_at: row.expires_at,
        }
    }
}

/// PostgreSQL repository for URL mappings.
///
/// Uniqueness of `short_code` is backed by the `url_mappings_short_code_key`
/// constraint; violations surface as [`AppError::Conflict`].
pub struct PgUrlMappingRepository {
    pool: Arc<PgPool>,
}

impl PgUrlMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlMappingRepository for PgUrlMappingRepository {
    async fn create(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError> {
        let row = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            INSERT INTO url_mappings (original_url, short_code, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, original_url, short_code, created_at, click_count, expires_at
            "#,
        )
        .bind(new_mapping.original_url)
        .bind(new_mapping.short_code)
        .bind(new_mapping.created_at)
        .bind(new_mapping.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>, AppError> {
        let row = sqlx::query_as::<_, UrlMappingRow>(
            r#"
            SELECT id, original_url, short_code, created_at, click_count, expires_at
            FROM url_mappings
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlMapping::from))
    }

    async fn assign_code(&self, id: i64, code: &str) -> Result<(), AppError> {
        // short_code is write-once: only rows still without a code are updated.
        let result = sqlx::query(
            r#"
            UPDATE url_mappings
            SET short_code = $2
            WHERE id = $1 AND short_code IS NULL
            "#,
        )
        .bind(id)
        .bind(code)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "No mapping awaiting a short code",
                json!({ "id": id }),
            ));
        }

        Ok(())
    }

    async fn increment_clicks(&self, id: i64) -> Result<i64, AppError> {
        let clicks = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE url_mappings
            SET click_count = click_count + 1
            WHERE id = $1
            RETURNING click_count
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        clicks.ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }

    async fn count_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM url_mappings WHERE expires_at < $1")
                .bind(now)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count.max(0) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM url_mappings WHERE expires_at < $1")
            .bind(now)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
