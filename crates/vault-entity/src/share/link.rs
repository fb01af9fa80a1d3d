//! Share link value object.

use serde::{Deserialize, Serialize};

/// A freshly issued share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLink {
    /// The share ID.
    pub share_id: uuid::Uuid,
    /// The full URL for accessing the share: `{origin}/shared/{token}`.
    pub url: String,
    /// The share token.
    pub token: String,
    /// When the link expires.
    pub expires_at: chrono::DateTime<chrono::Utc>,
}
