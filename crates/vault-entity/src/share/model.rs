//! File share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An expiring, token-addressed grant to view and download one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FileShare {
    /// Unique share identifier.
    pub id: Uuid,
    /// The shared file record.
    pub file_id: Uuid,
    /// Opaque token embedded in the share URL. Unique across all shares.
    pub share_token: String,
    /// Address the link was issued for.
    pub recipient_email: Option<String>,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
    /// The share stops resolving at this instant.
    pub expires_at: DateTime<Utc>,
    /// Last time the share was resolved.
    pub accessed_at: Option<DateTime<Utc>>,
}

impl FileShare {
    /// Check if the share is valid at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Data required to create a new share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShare {
    /// The shared file record.
    pub file_id: Uuid,
    /// Share token.
    pub share_token: String,
    /// Recipient address.
    pub recipient_email: Option<String>,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}
