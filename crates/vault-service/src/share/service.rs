//! Share link issuing, listing, revocation and purging.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use tokio::sync::watch;
use tokio::time;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use vault_core::config::ShareConfig;
use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_database::repositories::{FileRepository, ShareRepository};
use vault_entity::share::{CreateShare, FileShare, ShareLink};

use super::link::{LinkService, expiry_after_days};
use crate::context::RequestContext;
use crate::file::service::load_owned;

/// Issues and manages expiring share links for the caller's files.
#[derive(Debug, Clone)]
pub struct ShareService {
    files: Arc<dyn FileRepository>,
    shares: Arc<dyn ShareRepository>,
    links: LinkService,
    config: ShareConfig,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        files: Arc<dyn FileRepository>,
        shares: Arc<dyn ShareRepository>,
        config: ShareConfig,
    ) -> Self {
        Self {
            files,
            shares,
            links: LinkService::new(&config.public_origin),
            config,
        }
    }

    /// Expiry used when a request does not name one.
    pub fn default_expiry_days(&self) -> u32 {
        self.config.default_expiry_days
    }

    /// Share an owned file with `recipient_email` for `expires_in_days`
    /// calendar days.
    pub async fn create_share(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        recipient_email: &str,
        expires_in_days: u32,
    ) -> AppResult<ShareLink> {
        if expires_in_days == 0 || expires_in_days > self.config.max_expiry_days {
            return Err(AppError::validation(format!(
                "Expiry must be between 1 and {} days",
                self.config.max_expiry_days
            )));
        }
        let recipient_email = recipient_email.trim();
        if !recipient_email.validate_email() {
            return Err(AppError::validation("Invalid recipient email address"));
        }

        let file = load_owned(self.files.as_ref(), ctx, file_id).await?;
        let expires_at = expiry_after_days(Local::now(), expires_in_days)?;

        let attempts = self.config.token_retry_attempts.max(1);
        let mut attempt = 0;
        let share = loop {
            attempt += 1;
            let data = CreateShare {
                file_id: file.id,
                share_token: self.links.generate_token(),
                recipient_email: Some(recipient_email.to_string()),
                expires_at,
            };
            match self.shares.create(&data).await {
                Ok(share) => break share,
                Err(e) if e.is_conflict() && attempt < attempts => {
                    warn!(file_id = %file.id, attempt, "Share token collision, retrying");
                }
                Err(e) => return Err(e),
            }
        };

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            share_id = %share.id,
            expires_at = %share.expires_at,
            "Share created"
        );

        Ok(ShareLink {
            share_id: share.id,
            url: self.links.share_url(&share.share_token),
            token: share.share_token,
            expires_at: share.expires_at,
        })
    }

    /// Shares of an owned file, newest first.
    pub async fn list_shares_for_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> AppResult<Vec<FileShare>> {
        let file = load_owned(self.files.as_ref(), ctx, file_id).await?;
        self.shares.find_by_file(file.id).await
    }

    /// Delete a share of an owned file.
    pub async fn revoke_share(&self, ctx: &RequestContext, share_id: Uuid) -> AppResult<()> {
        let not_found = || AppError::not_found(format!("Share {share_id} not found"));

        let share = self
            .shares
            .find_by_id(share_id)
            .await?
            .ok_or_else(not_found)?;
        load_owned(self.files.as_ref(), ctx, share.file_id)
            .await
            .map_err(|_| not_found())?;

        if !self.shares.delete(share.id).await? {
            return Err(not_found());
        }

        info!(user_id = %ctx.user_id, share_id = %share.id, "Share revoked");
        Ok(())
    }

    /// Delete every share that has expired by `now`.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let purged = self.shares.delete_expired(now).await?;
        if purged > 0 {
            info!(purged, "Purged expired shares");
        }
        Ok(purged)
    }

    /// Purge expired shares every `interval` until the shutdown signal.
    pub async fn run_purge_loop(&self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        info!(interval_seconds = interval.as_secs(), "Expired share purge started");
        let mut ticker = time::interval(interval);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.purge_expired(Utc::now()).await {
                        error!(error = %e, "Expired share purge failed");
                    }
                }
            }
        }

        info!("Expired share purge stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use vault_core::error::ErrorKind;

    #[tokio::test]
    async fn test_create_share_link() {
        let fx = Fixture::new();
        let ctx = fx.context();
        let file = fx.upload(&ctx, "report.pdf", b"pdf").await;

        let before = Utc::now();
        let link = fx
            .share_service
            .create_share(&ctx, file.id, "a@b.com", 7)
            .await
            .unwrap();

        assert_eq!(link.url, format!("http://localhost:8080/shared/{}", link.token));
        assert!(link.expires_at > before + chrono::Duration::days(6));
        assert!(link.expires_at < before + chrono::Duration::days(8));

        let shares = fx
            .share_service
            .list_shares_for_file(&ctx, file.id)
            .await
            .unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].recipient_email.as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn test_create_share_validation() {
        let fx = Fixture::new();
        let ctx = fx.context();
        let file = fx.upload(&ctx, "a.txt", b"a").await;

        for days in [0, 91] {
            let err = fx
                .share_service
                .create_share(&ctx, file.id, "a@b.com", days)
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
        }

        let err = fx
            .share_service
            .create_share(&ctx, file.id, "not-an-email", 7)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = fx
            .share_service
            .create_share(&fx.other_context(), file.id, "a@b.com", 7)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_distinct_shares_have_distinct_tokens() {
        let fx = Fixture::new();
        let ctx = fx.context();
        let file = fx.upload(&ctx, "a.txt", b"a").await;

        let mut tokens = std::collections::HashSet::new();
        for _ in 0..50 {
            let link = fx
                .share_service
                .create_share(&ctx, file.id, "a@b.com", 1)
                .await
                .unwrap();
            assert!(tokens.insert(link.token));
        }
    }

    #[tokio::test]
    async fn test_revoke_share() {
        let fx = Fixture::new();
        let ctx = fx.context();
        let file = fx.upload(&ctx, "a.txt", b"a").await;
        let link = fx
            .share_service
            .create_share(&ctx, file.id, "a@b.com", 1)
            .await
            .unwrap();

        let err = fx
            .share_service
            .revoke_share(&fx.other_context(), link.share_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        fx.share_service.revoke_share(&ctx, link.share_id).await.unwrap();
        assert!(fx.shares.find_by_token(&link.token).await.unwrap().is_none());

        let err = fx
            .share_service
            .revoke_share(&ctx, link.share_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let fx = Fixture::new();
        let ctx = fx.context();
        let file = fx.upload(&ctx, "a.txt", b"a").await;
        let short = fx
            .share_service
            .create_share(&ctx, file.id, "a@b.com", 1)
            .await
            .unwrap();
        let long = fx
            .share_service
            .create_share(&ctx, file.id, "a@b.com", 30)
            .await
            .unwrap();

        let purged = fx
            .share_service
            .purge_expired(short.expires_at)
            .await
            .unwrap();
        assert_eq!(purged, 1);
        assert!(fx.shares.find_by_id(long.share_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_purge_loop_stops_on_shutdown() {
        let fx = Fixture::new();
        let (tx, rx) = watch::channel(false);
        let service = fx.share_service.clone();
        let handle = tokio::spawn(async move {
            service.run_purge_loop(Duration::from_secs(60), rx).await;
        });

        tx.send(true).unwrap();
        time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
