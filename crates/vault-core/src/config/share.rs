//! Share link configuration.

use serde::{Deserialize, Serialize};

/// Settings for issuing and redeeming share links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Origin prepended to `/shared/{token}` when building share URLs.
    #[serde(default = "default_public_origin")]
    pub public_origin: String,
    /// Expiry used when a request does not specify one.
    #[serde(default = "default_expiry_days")]
    pub default_expiry_days: u32,
    /// Longest allowed expiry, in days.
    #[serde(default = "default_max_expiry_days")]
    pub max_expiry_days: u32,
    /// How many fresh tokens to try when the store reports a collision.
    #[serde(default = "default_token_retry_attempts")]
    pub token_retry_attempts: u32,
    /// Interval of the expired-share purge. `0` disables it.
    #[serde(default)]
    pub purge_interval_minutes: u64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            public_origin: default_public_origin(),
            default_expiry_days: default_expiry_days(),
            max_expiry_days: default_max_expiry_days(),
            token_retry_attempts: default_token_retry_attempts(),
            purge_interval_minutes: 0,
        }
    }
}

fn default_public_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_expiry_days() -> u32 {
    7
}

fn default_max_expiry_days() -> u32 {
    90
}

fn default_token_retry_attempts() -> u32 {
    3
}
