//! File repository backed by PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use vault_core::result::AppResult;
use vault_entity::file::{CreateFile, FileRecord, FileVersion, NewFileVersion, VersionPlan};

use super::map_db_error;
use crate::repositories::FileRepository;

const INSERT_FILE: &str = "INSERT INTO files \
     (owner_id, name, size, mime_type, storage_path, is_encrypted, version, \
      encryption_method, previous_version_id) \
     VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7, $8) RETURNING *";

const LATEST_FILE: &str = "SELECT * FROM files WHERE owner_id = $1 AND name = $2 \
     ORDER BY version DESC LIMIT 1";

/// File repository using a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn bind_insert<'q>(
    data: &'q CreateFile,
    plan: VersionPlan,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, FileRecord, sqlx::postgres::PgArguments> {
    sqlx::query_as::<_, FileRecord>(INSERT_FILE)
        .bind(data.owner_id)
        .bind(&data.name)
        .bind(&data.size)
        .bind(&data.mime_type)
        .bind(&data.storage_path)
        .bind(plan.version)
        .bind(data.encryption_method.as_str())
        .bind(plan.previous_version_id)
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to find file", e))
    }

    async fn find_latest_by_owner_and_name(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(LATEST_FILE)
            .bind(owner_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to find latest file version", e))
    }

    async fn find_current_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM (\
               SELECT DISTINCT ON (name) * FROM files WHERE owner_id = $1 \
               ORDER BY name, version DESC\
             ) current ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list files", e))
    }

    async fn create(&self, data: &CreateFile, plan: VersionPlan) -> AppResult<FileRecord> {
        bind_insert(data, plan)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to create file", e))
    }

    async fn create_next_version(&self, data: &CreateFile) -> AppResult<FileRecord> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_db_error("Failed to begin transaction", e))?;

        // Serializes uploads of one chain until commit.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1 || '/' || $2, 0))")
            .bind(data.owner_id.to_string())
            .bind(&data.name)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error("Failed to lock file chain", e))?;

        let latest = sqlx::query_as::<_, FileRecord>(LATEST_FILE)
            .bind(data.owner_id)
            .bind(&data.name)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_db_error("Failed to find latest file version", e))?;

        let plan = VersionPlan::after(latest.as_ref());
        let record = bind_insert(data, plan)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_db_error("Failed to create file", e))?;

        tx.commit()
            .await
            .map_err(|e| map_db_error("Failed to commit file", e))?;

        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_version(&self, data: &NewFileVersion) -> AppResult<FileVersion> {
        sqlx::query_as::<_, FileVersion>(
            "INSERT INTO file_versions (file_id, version, previous_version_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.file_id)
        .bind(data.version)
        .bind(data.previous_version_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to create file version", e))
    }

    async fn find_chain_versions(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> AppResult<Vec<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT v.* FROM file_versions v JOIN files f ON f.id = v.file_id \
             WHERE f.owner_id = $1 AND f.name = $2 ORDER BY v.version DESC",
        )
        .bind(owner_id)
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list file versions", e))
    }

    async fn find_version_by_id(&self, id: Uuid) -> AppResult<Option<FileVersion>> {
        sqlx::query_as::<_, FileVersion>("SELECT * FROM file_versions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to find file version", e))
    }
}
