//! Metadata store selection from configuration.

use std::sync::Arc;

use tracing::info;

use vault_core::config::DatabaseConfig;
use vault_core::error::AppError;
use vault_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::{MemoryFileRepository, MemoryShareRepository, MemoryUserRepository};
use crate::migration::run_migrations;
use crate::postgres::{PgFileRepository, PgShareRepository, PgUserRepository};
use crate::repositories::{FileRepository, ShareRepository, UserRepository};

/// The set of repositories backing one metadata store.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// File records and version rows.
    pub files: Arc<dyn FileRepository>,
    /// Share grants.
    pub shares: Arc<dyn ShareRepository>,
    /// User accounts.
    pub users: Arc<dyn UserRepository>,
    /// The PostgreSQL pool, when that provider is active.
    pub pool: Option<DatabasePool>,
}

impl Repositories {
    /// Build the repositories selected by `config.provider`.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                let pg = pool.pool().clone();
                Ok(Self {
                    files: Arc::new(PgFileRepository::new(pg.clone())),
                    shares: Arc::new(PgShareRepository::new(pg.clone())),
                    users: Arc::new(PgUserRepository::new(pg)),
                    pool: Some(pool),
                })
            }
            "memory" => {
                info!("Using in-memory metadata store");
                Ok(Self::in_memory())
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// Fresh, empty in-memory repositories.
    pub fn in_memory() -> Self {
        Self {
            files: Arc::new(MemoryFileRepository::new()),
            shares: Arc::new(MemoryShareRepository::new()),
            users: Arc::new(MemoryUserRepository::new()),
            pool: None,
        }
    }

    /// Check metadata store connectivity.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }
}
