//! The per-file encryption key.
//!
//! Clients must present a key to upload or download, but the key is not
//! stored and never touches the bytes.

use vault_core::error::AppError;
use vault_core::result::AppResult;

/// Reject a missing or blank encryption key.
pub fn require_encryption_key(key: &str) -> AppResult<()> {
    if key.trim().is_empty() {
        return Err(AppError::validation("An encryption key is required"));
    }
    Ok(())
}
