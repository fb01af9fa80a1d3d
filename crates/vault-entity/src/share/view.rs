//! Outcome of redeeming a share token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::file::FileRecord;

use super::model::FileShare;

/// File metadata visible to the holder of a valid share token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareView {
    /// The share ID.
    pub share_id: Uuid,
    /// The shared file record.
    pub file_id: Uuid,
    /// File name.
    pub name: String,
    /// Formatted file size.
    pub size: String,
    /// MIME type.
    pub mime_type: String,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// Recipient address.
    pub recipient_email: Option<String>,
    /// When the share expires.
    pub expires_at: DateTime<Utc>,
}

impl ShareView {
    /// Build the view from a share and the file it points at.
    pub fn new(share: &FileShare, file: &FileRecord) -> Self {
        Self {
            share_id: share.id,
            file_id: file.id,
            name: file.name.clone(),
            size: file.size.clone(),
            mime_type: file.mime_type.clone(),
            created_at: file.created_at,
            recipient_email: share.recipient_email.clone(),
            expires_at: share.expires_at,
        }
    }
}

/// Result of resolving a share token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShareResolution {
    /// The share is valid.
    Available(ShareView),
    /// The share exists but its expiry has passed.
    Expired {
        /// When the share expired.
        expires_at: DateTime<Utc>,
    },
    /// No share has this token, or its file is gone.
    NotFound,
}
