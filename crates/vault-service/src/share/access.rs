//! Share redemption: resolving tokens and serving shared downloads.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use vault_core::result::AppResult;
use vault_core::traits::BlobStore;
use vault_database::repositories::{FileRepository, ShareRepository};
use vault_entity::share::{ShareResolution, ShareView};

use crate::file::FileDownload;
use crate::file::key::require_encryption_key;

/// Outcome of downloading through a share token.
#[derive(Debug, Clone)]
pub enum SharedDownload {
    /// The share is valid; here are the bytes.
    Ready(FileDownload),
    /// The share has expired.
    Expired {
        /// When the share expired.
        expires_at: DateTime<Utc>,
    },
    /// No such share, or its file is gone.
    NotFound,
}

/// Resolves share tokens for anonymous visitors.
#[derive(Debug, Clone)]
pub struct AccessService {
    files: Arc<dyn FileRepository>,
    shares: Arc<dyn ShareRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(
        files: Arc<dyn FileRepository>,
        shares: Arc<dyn ShareRepository>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            files,
            shares,
            blobs,
        }
    }

    /// Resolve a token at the current time.
    pub async fn resolve_share(&self, token: &str) -> AppResult<ShareResolution> {
        self.resolve_share_at(token, Utc::now()).await
    }

    /// Resolve a token as of `now`. Only store failures are errors; unknown
    /// and expired tokens are ordinary outcomes.
    pub async fn resolve_share_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<ShareResolution> {
        if token.is_empty() {
            return Ok(ShareResolution::NotFound);
        }
        let Some(share) = self.shares.find_by_token(token).await? else {
            return Ok(ShareResolution::NotFound);
        };

        if let Err(e) = self.shares.touch_accessed(share.id, now).await {
            warn!(share_id = %share.id, error = %e, "Failed to record share access");
        }

        if !share.is_valid_at(now) {
            return Ok(ShareResolution::Expired {
                expires_at: share.expires_at,
            });
        }

        Ok(match self.files.find_by_id(share.file_id).await? {
            Some(file) => ShareResolution::Available(ShareView::new(&share, &file)),
            None => ShareResolution::NotFound,
        })
    }

    /// Resolve a token and, when the share is valid, load the file bytes.
    pub async fn download_shared(
        &self,
        token: &str,
        encryption_key: &str,
    ) -> AppResult<SharedDownload> {
        require_encryption_key(encryption_key)?;

        let view = match self.resolve_share(token).await? {
            ShareResolution::Available(view) => view,
            ShareResolution::Expired { expires_at } => {
                return Ok(SharedDownload::Expired { expires_at });
            }
            ShareResolution::NotFound => return Ok(SharedDownload::NotFound),
        };

        let Some(file) = self.files.find_by_id(view.file_id).await? else {
            return Ok(SharedDownload::NotFound);
        };
        let data = self.blobs.get(&file.storage_path).await?;

        info!(share_id = %view.share_id, file_id = %file.id, "Shared file downloaded");
        Ok(SharedDownload::Ready(FileDownload {
            name: file.name,
            mime_type: file.mime_type,
            data,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use chrono::Duration;
    use vault_core::error::ErrorKind;

    #[tokio::test]
    async fn test_report_scenario() {
        let fx = Fixture::new();
        let ctx = fx.context();

        let v1 = fx.upload(&ctx, "report.pdf", b"draft").await;
        assert_eq!((v1.version, v1.previous_version_id), (1, None));
        let v2 = fx.upload(&ctx, "report.pdf", b"final").await;
        assert_eq!((v2.version, v2.previous_version_id), (2, Some(v1.id)));

        let link = fx
            .share_service
            .create_share(&ctx, v2.id, "a@b.com", 7)
            .await
            .unwrap();
        let token = link.url.rsplit('/').next().unwrap();
        assert_eq!(token, link.token);

        let ShareResolution::Available(view) = fx.access.resolve_share(token).await.unwrap() else {
            panic!("share should resolve");
        };
        assert_eq!(view.name, "report.pdf");
        assert_eq!(view.file_id, v2.id);

        let just_before = link.expires_at - Duration::milliseconds(1);
        assert!(matches!(
            fx.access.resolve_share_at(token, just_before).await.unwrap(),
            ShareResolution::Available(_)
        ));
        assert_eq!(
            fx.access
                .resolve_share_at(token, link.expires_at)
                .await
                .unwrap(),
            ShareResolution::Expired {
                expires_at: link.expires_at
            }
        );
        assert!(matches!(
            fx.access
                .resolve_share_at(token, link.expires_at + Duration::days(1))
                .await
                .unwrap(),
            ShareResolution::Expired { .. }
        ));

        // Expired shares are kept until purged.
        assert!(fx.shares.find_by_token(token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let fx = Fixture::new();
        assert_eq!(
            fx.access.resolve_share("nonexistent-token").await.unwrap(),
            ShareResolution::NotFound
        );
        assert_eq!(
            fx.access.resolve_share("").await.unwrap(),
            ShareResolution::NotFound
        );
    }

    #[tokio::test]
    async fn test_resolution_touches_access_time() {
        let fx = Fixture::new();
        let ctx = fx.context();
        let file = fx.upload(&ctx, "a.txt", b"a").await;
        let link = fx
            .share_service
            .create_share(&ctx, file.id, "a@b.com", 7)
            .await
            .unwrap();

        let first_at = Utc::now();
        let second_at = first_at + Duration::seconds(5);
        let first = fx.access.resolve_share_at(&link.token, first_at).await.unwrap();
        let touched = fx.shares.find_by_token(&link.token).await.unwrap().unwrap();
        assert_eq!(touched.accessed_at, Some(first_at));

        let second = fx.access.resolve_share_at(&link.token, second_at).await.unwrap();
        let touched = fx.shares.find_by_token(&link.token).await.unwrap().unwrap();
        assert_eq!(touched.accessed_at, Some(second_at));

        assert_eq!(first, second);

        let expired_at = link.expires_at + Duration::seconds(1);
        fx.access.resolve_share_at(&link.token, expired_at).await.unwrap();
        let touched = fx.shares.find_by_token(&link.token).await.unwrap().unwrap();
        assert_eq!(touched.accessed_at, Some(expired_at));
    }

    #[tokio::test]
    async fn test_share_of_deleted_file_is_not_found() {
        let fx = Fixture::new();
        let ctx = fx.context();
        let file = fx.upload(&ctx, "a.txt", b"a").await;
        let link = fx
            .share_service
            .create_share(&ctx, file.id, "a@b.com", 7)
            .await
            .unwrap();

        fx.file_service.delete_file(&ctx, file.id).await.unwrap();
        assert_eq!(
            fx.access.resolve_share(&link.token).await.unwrap(),
            ShareResolution::NotFound
        );
    }

    #[tokio::test]
    async fn test_download_shared() {
        let fx = Fixture::new();
        let ctx = fx.context();
        let file = fx.upload(&ctx, "a.txt", b"shared bytes").await;
        let link = fx
            .share_service
            .create_share(&ctx, file.id, "a@b.com", 7)
            .await
            .unwrap();

        let err = fx
            .access
            .download_shared(&link.token, "")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let SharedDownload::Ready(download) =
            fx.access.download_shared(&link.token, "k").await.unwrap()
        else {
            panic!("download should be ready");
        };
        assert_eq!(download.name, "a.txt");
        assert_eq!(&download.data[..], b"shared bytes");

        assert!(matches!(
            fx.access.download_shared("missing", "k").await.unwrap(),
            SharedDownload::NotFound
        ));
    }
}
