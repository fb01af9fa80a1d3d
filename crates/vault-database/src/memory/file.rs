//! In-memory file repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_entity::file::{CreateFile, FileRecord, FileVersion, NewFileVersion, VersionPlan};

use crate::repositories::FileRepository;

#[derive(Debug, Default)]
struct FileState {
    files: HashMap<Uuid, FileRecord>,
    versions: HashMap<Uuid, FileVersion>,
}

impl FileState {
    fn latest(&self, owner_id: Uuid, name: &str) -> Option<&FileRecord> {
        self.files
            .values()
            .filter(|f| f.owner_id == owner_id && f.name == name)
            .max_by_key(|f| f.version)
    }

    fn insert(&mut self, data: &CreateFile, plan: VersionPlan) -> AppResult<FileRecord> {
        let taken = self.files.values().any(|f| {
            f.owner_id == data.owner_id && f.name == data.name && f.version == plan.version
        });
        if taken {
            return Err(AppError::conflict(format!(
                "File '{}' version {} already exists",
                data.name, plan.version
            )));
        }

        let now = Utc::now();
        let record = FileRecord {
            id: Uuid::new_v4(),
            owner_id: data.owner_id,
            name: data.name.clone(),
            size: data.size.clone(),
            mime_type: data.mime_type.clone(),
            storage_path: data.storage_path.clone(),
            is_encrypted: true,
            version: plan.version,
            encryption_method: data.encryption_method.as_str().to_string(),
            previous_version_id: plan.previous_version_id,
            created_at: now,
            updated_at: now,
        };
        self.files.insert(record.id, record.clone());
        Ok(record)
    }
}

/// File repository holding records in process memory.
#[derive(Debug, Default)]
pub struct MemoryFileRepository {
    state: RwLock<FileState>,
}

impl MemoryFileRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileRepository for MemoryFileRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>> {
        Ok(self.state.read().await.files.get(&id).cloned())
    }

    async fn find_latest_by_owner_and_name(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> AppResult<Option<FileRecord>> {
        Ok(self.state.read().await.latest(owner_id, name).cloned())
    }

    async fn find_current_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<FileRecord>> {
        let state = self.state.read().await;
        let mut current: HashMap<&str, &FileRecord> = HashMap::new();
        for file in state.files.values().filter(|f| f.owner_id == owner_id) {
            let entry = current.entry(file.name.as_str()).or_insert(file);
            if file.version > entry.version {
                *entry = file;
            }
        }

        let mut files: Vec<FileRecord> = current.into_values().cloned().collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.name.cmp(&b.name)));
        Ok(files)
    }

    async fn create(&self, data: &CreateFile, plan: VersionPlan) -> AppResult<FileRecord> {
        self.state.write().await.insert(data, plan)
    }

    async fn create_next_version(&self, data: &CreateFile) -> AppResult<FileRecord> {
        let mut state = self.state.write().await;
        let plan = VersionPlan::after(state.latest(data.owner_id, &data.name));
        state.insert(data, plan)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.files.remove(&id).is_none() {
            return Ok(false);
        }

        state.versions.retain(|_, v| v.file_id != id);
        for version in state.versions.values_mut() {
            if version.previous_version_id == Some(id) {
                version.previous_version_id = None;
            }
        }
        for file in state.files.values_mut() {
            if file.previous_version_id == Some(id) {
                file.previous_version_id = None;
            }
        }
        Ok(true)
    }

    async fn create_version(&self, data: &NewFileVersion) -> AppResult<FileVersion> {
        let mut state = self.state.write().await;
        if !state.files.contains_key(&data.file_id) {
            return Err(AppError::database(format!(
                "File {} does not exist",
                data.file_id
            )));
        }

        let version = FileVersion {
            id: Uuid::new_v4(),
            file_id: data.file_id,
            version: data.version,
            previous_version_id: data.previous_version_id,
            created_at: Utc::now(),
        };
        state.versions.insert(version.id, version.clone());
        Ok(version)
    }

    async fn find_chain_versions(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> AppResult<Vec<FileVersion>> {
        let state = self.state.read().await;
        let mut versions: Vec<FileVersion> = state
            .versions
            .values()
            .filter(|v| {
                state
                    .files
                    .get(&v.file_id)
                    .is_some_and(|f| f.owner_id == owner_id && f.name == name)
            })
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(versions)
    }

    async fn find_version_by_id(&self, id: Uuid) -> AppResult<Option<FileVersion>> {
        Ok(self.state.read().await.versions.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use vault_core::error::ErrorKind;
    use vault_entity::file::EncryptionMethod;

    fn upload(owner_id: Uuid, name: &str) -> CreateFile {
        CreateFile {
            owner_id,
            name: name.to_string(),
            size: "3 B".to_string(),
            mime_type: "text/plain".to_string(),
            storage_path: format!("{owner_id}/0_{name}"),
            encryption_method: EncryptionMethod::default(),
        }
    }

    #[tokio::test]
    async fn test_next_version_links_chain() {
        let repo = MemoryFileRepository::new();
        let owner = Uuid::new_v4();

        let v1 = repo.create_next_version(&upload(owner, "a.txt")).await.unwrap();
        let v2 = repo.create_next_version(&upload(owner, "a.txt")).await.unwrap();
        let other = repo.create_next_version(&upload(owner, "b.txt")).await.unwrap();

        assert_eq!(v1.version, 1);
        assert_eq!(v1.previous_version_id, None);
        assert_eq!(v2.version, 2);
        assert_eq!(v2.previous_version_id, Some(v1.id));
        assert_eq!(other.version, 1);

        let latest = repo
            .find_latest_by_owner_and_name(owner, "a.txt")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, v2.id);
    }

    #[tokio::test]
    async fn test_duplicate_version_conflicts() {
        let repo = MemoryFileRepository::new();
        let owner = Uuid::new_v4();
        let data = upload(owner, "a.txt");
        let plan = VersionPlan::after(None);

        repo.create(&data, plan).await.unwrap();
        let err = repo.create(&data, plan).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_concurrent_uploads_are_gap_free() {
        let repo = Arc::new(MemoryFileRepository::new());
        let owner = Uuid::new_v4();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.create_next_version(&upload(owner, "same.txt")).await
                })
            })
            .collect();

        let mut versions = Vec::new();
        for handle in handles {
            versions.push(handle.await.unwrap().unwrap().version);
        }
        versions.sort_unstable();
        assert_eq!(versions, (1..=16).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_current_listing_and_delete_cascade() {
        let repo = MemoryFileRepository::new();
        let owner = Uuid::new_v4();

        let v1 = repo.create_next_version(&upload(owner, "a.txt")).await.unwrap();
        let v2 = repo.create_next_version(&upload(owner, "a.txt")).await.unwrap();
        repo.create_version(&NewFileVersion {
            file_id: v2.id,
            version: v2.version,
            previous_version_id: Some(v1.id),
        })
        .await
        .unwrap();

        let current = repo.find_current_by_owner(owner).await.unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].id, v2.id);

        let chain = repo.find_chain_versions(owner, "a.txt").await.unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].previous_version_id, Some(v1.id));

        assert!(repo.delete(v2.id).await.unwrap());
        assert!(!repo.delete(v2.id).await.unwrap());
        assert!(repo.find_chain_versions(owner, "a.txt").await.unwrap().is_empty());

        let current = repo.find_current_by_owner(owner).await.unwrap();
        assert_eq!(current[0].id, v1.id);
    }
}
