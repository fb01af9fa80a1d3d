//! User repository backed by PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_entity::user::{CreateUser, ProfileUpdate, User, UserProfile};

use super::map_db_error;
use crate::repositories::UserRepository;

/// User repository using a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to find user by id", e))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to find user by email", e))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, full_name) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.full_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to create user", e))
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET full_name = COALESCE($2, full_name), \
             avatar_url = COALESCE($3, avatar_url), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&update.full_name)
        .bind(&update.avatar_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to update user", e))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    async fn list_profiles(&self) -> AppResult<Vec<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT id, email, full_name, avatar_url FROM users \
             ORDER BY full_name ASC NULLS LAST, email ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to list users", e))
    }
}
