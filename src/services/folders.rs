use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{conflict_as, ServiceError};
use crate::database::models::Folder;
use crate::filter::scope::{self, FOLDERS, NOTES};
use crate::store::Store;

pub const FOLDER_NAME_TAKEN: &str = "The folder name already exists";

pub struct FolderService {
    store: Arc<dyn Store>,
}

impl FolderService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Owner's folders, name ascending
    pub async fn list(&self, owner: Uuid) -> Result<Vec<Folder>, ServiceError> {
        let filter = scope::owned(FOLDERS, owner)?.order("name asc")?;
        Ok(self.store.list_folders(filter).await?)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Folder, ServiceError> {
        self.store
            .find_folder(scope::owned_by_id(FOLDERS, owner, id)?)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn create(&self, owner: Uuid, name: String) -> Result<Folder, ServiceError> {
        let folder = self
            .store
            .insert_folder(owner, name)
            .await
            .map_err(conflict_as(FOLDER_NAME_TAKEN))?;
        info!("Created folder {} for user {}", folder.id, owner);
        Ok(folder)
    }

    pub async fn rename(&self, owner: Uuid, id: Uuid, name: String) -> Result<Folder, ServiceError> {
        self.store
            .update_folder(owner, id, name)
            .await
            .map_err(conflict_as(FOLDER_NAME_TAKEN))?
            .ok_or(ServiceError::NotFound)
    }

    /// Remove the folder, then every note of the same owner filed under it.
    /// The two steps are separate store calls. Returns the number of notes removed.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<u64, ServiceError> {
        let removed = self
            .store
            .delete_folders(scope::owned_by_id(FOLDERS, owner, id)?)
            .await?;
        if removed == 0 {
            return Err(ServiceError::NotFound);
        }

        let notes = scope::owned(NOTES, owner)?.where_eq("folder_id", id)?;
        let cascaded = self.store.delete_notes(notes).await?;
        info!(
            "Deleted folder {} for user {} and {} note(s) filed under it",
            id, owner, cascaded
        );
        Ok(cascaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewNote;
    use crate::store::{MemoryStore, NoteStore};

    fn service() -> (FolderService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (FolderService::new(store.clone()), store)
    }

    fn note_in(folder_id: Option<Uuid>) -> NewNote {
        NewNote {
            title: "note".into(),
            folder_id,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let (folders, _) = service();
        let owner = Uuid::new_v4();
        for name in ["Work", "Archive", "Personal"] {
            folders.create(owner, name.into()).await.unwrap();
        }
        let names: Vec<String> = folders
            .list(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["Archive", "Personal", "Work"]);
    }

    #[tokio::test]
    async fn mixed_case_names_sort_in_byte_order() {
        let (folders, _) = service();
        let owner = Uuid::new_v4();
        for name in ["beta", "Zeta", "alpha"] {
            folders.create(owner, name.into()).await.unwrap();
        }
        let names: Vec<String> = folders
            .list(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["Zeta", "alpha", "beta"]);
    }

    #[tokio::test]
    async fn duplicate_name_is_a_conflict() {
        let (folders, _) = service();
        let owner = Uuid::new_v4();
        folders.create(owner, "Work".into()).await.unwrap();
        let err = folders.create(owner, "Work".into()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == FOLDER_NAME_TAKEN));
        assert_eq!(folders.list(owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rename_of_unknown_id_is_not_found_even_when_name_is_taken() {
        let (folders, _) = service();
        let (owner, other) = (Uuid::new_v4(), Uuid::new_v4());
        let folder = folders.create(owner, "Work".into()).await.unwrap();

        assert!(matches!(
            folders.rename(owner, Uuid::new_v4(), "Work".into()).await,
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            folders.rename(other, folder.id, "Work".into()).await,
            Err(ServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn other_owners_cannot_see_or_delete() {
        let (folders, _) = service();
        let (owner, other) = (Uuid::new_v4(), Uuid::new_v4());
        let folder = folders.create(owner, "Work".into()).await.unwrap();

        assert!(matches!(folders.get(other, folder.id).await, Err(ServiceError::NotFound)));
        assert!(matches!(folders.delete(other, folder.id).await, Err(ServiceError::NotFound)));
        assert!(matches!(
            folders.rename(other, folder.id, "Mine".into()).await,
            Err(ServiceError::NotFound)
        ));
        assert_eq!(folders.get(owner, folder.id).await.unwrap().name, "Work");
    }

    #[tokio::test]
    async fn delete_cascades_to_notes_in_that_folder_only() {
        let (folders, store) = service();
        let (owner, other) = (Uuid::new_v4(), Uuid::new_v4());
        let f = folders.create(owner, "F".into()).await.unwrap();
        let g = folders.create(owner, "G".into()).await.unwrap();
        for _ in 0..3 {
            store.insert_note(owner, note_in(Some(f.id))).await.unwrap();
        }
        store.insert_note(owner, note_in(Some(g.id))).await.unwrap();
        store.insert_note(owner, note_in(None)).await.unwrap();
        // Another owner's note that happens to carry the same folder id
        store.insert_note(other, note_in(Some(f.id))).await.unwrap();

        assert_eq!(folders.delete(owner, f.id).await.unwrap(), 3);

        let left = store.list_notes(scope::owned(NOTES, owner).unwrap()).await.unwrap();
        assert_eq!(left.len(), 2);
        assert!(left.iter().all(|n| n.folder_id != Some(f.id)));
        let theirs = store.list_notes(scope::owned(NOTES, other).unwrap()).await.unwrap();
        assert_eq!(theirs.len(), 1);
    }
}
