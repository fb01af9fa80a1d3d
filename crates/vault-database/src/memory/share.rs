//! In-memory share repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_entity::share::{CreateShare, FileShare};

use crate::repositories::ShareRepository;

/// Share repository holding grants in process memory.
#[derive(Debug, Default)]
pub struct MemoryShareRepository {
    shares: RwLock<HashMap<Uuid, FileShare>>,
}

impl MemoryShareRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShareRepository for MemoryShareRepository {
    async fn find_by_token(&self, token: &str) -> AppResult<Option<FileShare>> {
        Ok(self
            .shares
            .read()
            .await
            .values()
            .find(|s| s.share_token == token)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileShare>> {
        Ok(self.shares.read().await.get(&id).cloned())
    }

    async fn find_by_file(&self, file_id: Uuid) -> AppResult<Vec<FileShare>> {
        let mut shares: Vec<FileShare> = self
            .shares
            .read()
            .await
            .values()
            .filter(|s| s.file_id == file_id)
            .cloned()
            .collect();
        shares.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(shares)
    }

    async fn create(&self, data: &CreateShare) -> AppResult<FileShare> {
        let mut shares = self.shares.write().await;
        if shares.values().any(|s| s.share_token == data.share_token) {
            return Err(AppError::conflict("Share token already exists"));
        }

        let share = FileShare {
            id: Uuid::new_v4(),
            file_id: data.file_id,
            share_token: data.share_token.clone(),
            recipient_email: data.recipient_email.clone(),
            created_at: Utc::now(),
            expires_at: data.expires_at,
            accessed_at: None,
        };
        shares.insert(share.id, share.clone());
        Ok(share)
    }

    async fn touch_accessed(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(share) = self.shares.write().await.get_mut(&id) {
            share.accessed_at = Some(at);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.shares.write().await.remove(&id).is_some())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut shares = self.shares.write().await;
        let before = shares.len();
        shares.retain(|_, s| s.expires_at > now);
        Ok((before - shares.len()) as u64)
    }
}
