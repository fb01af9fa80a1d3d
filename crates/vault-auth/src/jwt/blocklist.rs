//! Revoked token tracking.

use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use vault_core::config::AuthConfig;

/// In-process set of revoked JWT IDs.
///
/// Entries live for the access token TTL, so a revoked token is remembered
/// at least until it would have expired anyway. The cache has no capacity
/// bound; entries leave only through expiry.
#[derive(Debug, Clone)]
pub struct TokenBlocklist {
    revoked: Cache<Uuid, ()>,
}

impl TokenBlocklist {
    /// Create a blocklist whose entries expire with the configured token
    /// lifetime.
    pub fn new(config: &AuthConfig) -> Self {
        let ttl = Duration::from_secs(config.jwt_access_ttl_minutes.saturating_mul(60).max(60));
        Self {
            revoked: Cache::builder().time_to_live(ttl).build(),
        }
    }

    /// Mark a token ID as revoked.
    pub async fn revoke(&self, jti: Uuid) {
        self.revoked.insert(jti, ()).await;
    }

    /// Whether the token ID has been revoked.
    pub async fn is_revoked(&self, jti: &Uuid) -> bool {
        self.revoked.contains_key(jti)
    }
}
