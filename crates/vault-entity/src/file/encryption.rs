//! Encryption method tag attached to uploaded files.
//!
//! The tag is recorded alongside the file and shown to users. It is never
//! used to transform file bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use vault_core::error::AppError;

/// The encryption method a user selected at upload time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncryptionMethod {
    /// AES-256 (standard).
    #[default]
    #[serde(rename = "AES-256")]
    Aes256,
    /// AES-512 (advanced).
    #[serde(rename = "AES-512")]
    Aes512,
    /// ChaCha20-Poly1305.
    #[serde(rename = "ChaCha20")]
    ChaCha20,
}

impl EncryptionMethod {
    /// Return the tag as stored in the metadata store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aes256 => "AES-256",
            Self::Aes512 => "AES-512",
            Self::ChaCha20 => "ChaCha20",
        }
    }
}

impl fmt::Display for EncryptionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EncryptionMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AES-256" => Ok(Self::Aes256),
            "AES-512" => Ok(Self::Aes512),
            "ChaCha20" => Ok(Self::ChaCha20),
            other => Err(AppError::validation(format!(
                "Unknown encryption method: '{other}'. Supported: AES-256, AES-512, ChaCha20"
            ))),
        }
    }
}
