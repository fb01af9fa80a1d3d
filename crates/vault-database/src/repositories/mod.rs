//! Metadata store interfaces.
//!
//! Services depend on these traits through `Arc<dyn ...>` so the backing store
//! is chosen by configuration. Every method maps backend failures to
//! [`ErrorKind::Database`](vault_core::error::ErrorKind::Database) and
//! uniqueness violations to `Conflict`.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use vault_core::result::AppResult;
use vault_entity::file::{CreateFile, FileRecord, FileVersion, NewFileVersion, VersionPlan};
use vault_entity::share::{CreateShare, FileShare};
use vault_entity::user::{CreateUser, ProfileUpdate, User, UserProfile};

/// Storage of file records and their version rows.
#[async_trait]
pub trait FileRepository: Send + Sync + Debug + 'static {
    /// Find a file record by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>>;

    /// Find the highest-versioned record for `(owner_id, name)`.
    async fn find_latest_by_owner_and_name(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> AppResult<Option<FileRecord>>;

    /// List the current record of every chain owned by `owner_id`, newest
    /// first.
    async fn find_current_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<FileRecord>>;

    /// Insert a record with an explicit version. Fails with `Conflict` when
    /// `(owner_id, name, version)` already exists.
    async fn create(&self, data: &CreateFile, plan: VersionPlan) -> AppResult<FileRecord>;

    /// Assign the next version of the `(owner_id, name)` chain and insert the
    /// record as one atomic step.
    async fn create_next_version(&self, data: &CreateFile) -> AppResult<FileRecord>;

    /// Delete a record. Version rows pointing at it go with it. Returns
    /// whether a row was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Append a version row.
    async fn create_version(&self, data: &NewFileVersion) -> AppResult<FileVersion>;

    /// Version rows of the `(owner_id, name)` chain, version descending.
    async fn find_chain_versions(&self, owner_id: Uuid, name: &str)
    -> AppResult<Vec<FileVersion>>;

    /// Find a version row by ID.
    async fn find_version_by_id(&self, id: Uuid) -> AppResult<Option<FileVersion>>;
}

/// Storage of share grants.
#[async_trait]
pub trait ShareRepository: Send + Sync + Debug + 'static {
    /// Find a share by its exact token.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<FileShare>>;

    /// Find a share by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileShare>>;

    /// Shares of one file, newest first.
    async fn find_by_file(&self, file_id: Uuid) -> AppResult<Vec<FileShare>>;

    /// Insert a share. Fails with `Conflict` when the token is taken.
    async fn create(&self, data: &CreateShare) -> AppResult<FileShare>;

    /// Set `accessed_at` on the share.
    async fn touch_accessed(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Delete a share. Returns whether a row was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Delete every share with `expires_at <= now`. Returns the count.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Storage of user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug + 'static {
    /// Find a user by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a user. Fails with `Conflict` when the email is taken.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Apply a profile update and return the updated user.
    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> AppResult<User>;

    /// Public profiles of every user, ordered by full name.
    async fn list_profiles(&self) -> AppResult<Vec<UserProfile>>;
}
