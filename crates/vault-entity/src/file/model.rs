//! File record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::encryption::EncryptionMethod;
use super::version::FileVersion;

/// One uploaded version of a user's file.
///
/// Re-uploading a file with the same name creates a new record with the next
/// version number; the record with the highest version for an
/// `(owner_id, name)` pair is the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    /// Unique file identifier.
    pub id: Uuid,
    /// The user who uploaded the file.
    pub owner_id: Uuid,
    /// The file name (including extension).
    pub name: String,
    /// Formatted size, e.g. `"1.50 KB"`.
    pub size: String,
    /// MIME type, or the file extension when no type is known.
    pub mime_type: String,
    /// The path of the content in the blob store.
    pub storage_path: String,
    /// Always `true`; kept for display.
    pub is_encrypted: bool,
    /// Version number within the `(owner_id, name)` chain, starting at 1.
    pub version: i32,
    /// Encryption method tag (see [`EncryptionMethod`]).
    pub encryption_method: String,
    /// The record this one supersedes.
    pub previous_version_id: Option<Uuid>,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    /// The download name for this record's content when served as an older
    /// version: `report_v2.pdf`.
    pub fn versioned_name(&self) -> String {
        match self.name.rsplit_once('.') {
            Some((base, ext)) if !base.is_empty() => format!("{base}_v{}.{ext}", self.version),
            _ => format!("{}_v{}", self.name, self.version),
        }
    }
}

/// Data required to create a new file record. Version and chain link are
/// assigned by the metadata store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The uploading user.
    pub owner_id: Uuid,
    /// The file name.
    pub name: String,
    /// Formatted size.
    pub size: String,
    /// MIME type.
    pub mime_type: String,
    /// The path in the blob store.
    pub storage_path: String,
    /// Encryption method tag.
    pub encryption_method: EncryptionMethod,
}

/// A current file record together with the version history of its chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileWithVersions {
    /// The current record.
    #[serde(flatten)]
    pub file: FileRecord,
    /// History rows of the chain, newest first.
    pub versions: Vec<FileVersion>,
}
