//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use vault_auth::AuthProvider;
use vault_core::config::AppConfig;
use vault_core::traits::BlobStore;
use vault_database::Repositories;
use vault_service::{
    AccessService, FileService, ShareService, UploadService, VersionService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Metadata store repositories
    pub repositories: Repositories,
    /// Blob store
    pub blobs: Arc<dyn BlobStore>,

    // ── Auth ─────────────────────────────────────────────────
    /// Account and session provider
    pub auth: Arc<dyn AuthProvider>,

    // ── Services ─────────────────────────────────────────────
    /// File listing, download and deletion
    pub file_service: Arc<FileService>,
    /// Uploads and version assignment
    pub upload_service: Arc<UploadService>,
    /// Version history
    pub version_service: Arc<VersionService>,
    /// Share issuing and revocation
    pub share_service: Arc<ShareService>,
    /// Public share redemption
    pub access_service: Arc<AccessService>,
}
