//! File version entity and version chain planning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::model::FileRecord;

/// A historical pointer appended when a file is superseded by a newer upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FileVersion {
    /// Unique version identifier.
    pub id: Uuid,
    /// The superseding file record.
    pub file_id: Uuid,
    /// Version number of the superseding record.
    pub version: i32,
    /// The superseded record.
    pub previous_version_id: Option<Uuid>,
    /// When this version row was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a version row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFileVersion {
    /// The superseding file record.
    pub file_id: Uuid,
    /// Version number of the superseding record.
    pub version: i32,
    /// The superseded record.
    pub previous_version_id: Option<Uuid>,
}

/// Version number and chain link assigned to an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPlan {
    /// Version number for the new record.
    pub version: i32,
    /// The record the new one supersedes, if any.
    pub previous_version_id: Option<Uuid>,
}

impl VersionPlan {
    /// Plan the version following `latest`, the highest-versioned record of
    /// the chain (or `None` for a new chain).
    pub fn after(latest: Option<&FileRecord>) -> Self {
        match latest {
            Some(record) => Self {
                version: record.version + 1,
                previous_version_id: Some(record.id),
            },
            None => Self {
                version: 1,
                previous_version_id: None,
            },
        }
    }

    /// Whether the upload supersedes an existing record.
    pub fn is_update(&self) -> bool {
        self.previous_version_id.is_some()
    }
}
