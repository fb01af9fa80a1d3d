//! Share repository backed by PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use vault_core::result::AppResult;
use vault_entity::share::{CreateShare, FileShare};

use super::map_db_error;
use crate::repositories::ShareRepository;

/// Share repository using a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PgShareRepository {
    pool: PgPool,
}

impl PgShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareRepository for PgShareRepository {
    async fn find_by_token(&self, token: &str) -> AppResult<Option<FileShare>> {
        sqlx::query_as::<_, FileShare>("SELECT * FROM file_shares WHERE share_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to find share by token", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileShare>> {
        sqlx::query_as::<_, FileShare>("SELECT * FROM file_shares WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to find share", e))
    }

    async fn find_by_file(&self, file_id: Uuid) -> AppResult<Vec<FileShare>> {
        sqlx::query_as::<_, FileShare>(
            "SELECT * FROM file_shares WHERE file_id = $1 ORDER BY created_at DESC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list shares", e))
    }

    async fn create(&self, data: &CreateShare) -> AppResult<FileShare> {
        sqlx::query_as::<_, FileShare>(
            "INSERT INTO file_shares (file_id, share_token, recipient_email, expires_at) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.file_id)
        .bind(&data.share_token)
        .bind(&data.recipient_email)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to create share", e))
    }

    async fn touch_accessed(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE file_shares SET accessed_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to update share access time", e))?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM file_shares WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to delete share", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM file_shares WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to purge expired shares", e))?;
        Ok(result.rows_affected())
    }
}
