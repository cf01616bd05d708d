use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::references::{dedupe, validate_folder_ref, validate_tag_refs};
use super::ServiceError;
use crate::database::models::{Folder, NewNote, Note, NotePatch, Tag};
use crate::filter::scope::{self, FOLDERS, NOTES, TAGS};
use crate::filter::NoteQuery;
use crate::store::Store;

/// A note with its folder and tag references resolved for reading
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedNote {
    pub note: Note,
    pub folder: Option<Folder>,
    pub tags: Vec<Tag>,
}

pub struct NoteService {
    store: Arc<dyn Store>,
}

impl NoteService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Owner's notes matching `query`, most recently updated first
    pub async fn list(&self, owner: Uuid, query: &NoteQuery) -> Result<Vec<Note>, ServiceError> {
        let notes = self.store.list_notes(query.to_filter(owner)?).await?;
        debug!("Listed {} note(s) for user {}", notes.len(), owner);
        Ok(notes)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Note, ServiceError> {
        self.store
            .find_note(scope::owned_by_id(NOTES, owner, id)?)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn create(&self, owner: Uuid, mut note: NewNote) -> Result<Note, ServiceError> {
        note.tags = dedupe(&note.tags);
        validate_folder_ref(self.store.as_ref(), owner, note.folder_id).await?;
        validate_tag_refs(self.store.as_ref(), owner, Some(note.tags.as_slice())).await?;

        Ok(self.store.insert_note(owner, note).await?)
    }

    /// Apply the supplied fields. References are checked only for the fields present.
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        mut patch: NotePatch,
    ) -> Result<Note, ServiceError> {
        if patch.is_empty() {
            return Err(ServiceError::validation("No valid update fields in request body"));
        }
        if let Some(tags) = patch.tags.as_mut() {
            *tags = dedupe(tags);
        }
        if let Some(folder_id) = patch.folder_id {
            validate_folder_ref(self.store.as_ref(), owner, folder_id).await?;
        }
        validate_tag_refs(self.store.as_ref(), owner, patch.tags.as_deref()).await?;

        self.store
            .update_note(owner, id, patch)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Notes are leaves: nothing cascades from here
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let removed = self
            .store
            .delete_notes(scope::owned_by_id(NOTES, owner, id)?)
            .await?;
        if removed == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    /// Resolve folder and tag references for a batch of notes with one query
    /// per referenced table. References that no longer resolve are dropped.
    pub async fn expand(
        &self,
        owner: Uuid,
        notes: Vec<Note>,
    ) -> Result<Vec<ExpandedNote>, ServiceError> {
        let folder_ids = dedupe(&notes.iter().filter_map(|n| n.folder_id).collect::<Vec<_>>());
        let tag_ids = dedupe(&notes.iter().flat_map(|n| n.tags.iter().copied()).collect::<Vec<_>>());

        let folders: HashMap<Uuid, Folder> = if folder_ids.is_empty() {
            HashMap::new()
        } else {
            self.store
                .list_folders(scope::owned_by_ids(FOLDERS, owner, &folder_ids)?)
                .await?
                .into_iter()
                .map(|f| (f.id, f))
                .collect()
        };
        let tags: HashMap<Uuid, Tag> = if tag_ids.is_empty() {
            HashMap::new()
        } else {
            self.store
                .list_tags(scope::owned_by_ids(TAGS, owner, &tag_ids)?)
                .await?
                .into_iter()
                .map(|t| (t.id, t))
                .collect()
        };

        Ok(notes
            .into_iter()
            .map(|note| ExpandedNote {
                folder: note.folder_id.and_then(|id| folders.get(&id).cloned()),
                tags: note.tags.iter().filter_map(|id| tags.get(id).cloned()).collect(),
                note,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::references::{INVALID_FOLDER_REF, INVALID_TAG_REF};
    use crate::store::{FolderStore, MemoryStore, NoteStore, TagStore};

    fn service() -> (NoteService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (NoteService::new(store.clone()), store)
    }

    fn titled(title: &str) -> NewNote {
        NewNote {
            title: title.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn foreign_folder_is_rejected_and_nothing_saved() {
        let (notes, store) = service();
        let (owner, other) = (Uuid::new_v4(), Uuid::new_v4());
        let theirs = store.insert_folder(other, "Theirs".into()).await.unwrap();

        let note = NewNote {
            folder_id: Some(theirs.id),
            ..titled("x")
        };
        let err = notes.create(owner, note).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == INVALID_FOLDER_REF));
        assert!(notes.list(owner, &NoteQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_tag_is_rejected() {
        let (notes, _) = service();
        let note = NewNote {
            tags: vec![Uuid::new_v4()],
            ..titled("x")
        };
        let err = notes.create(Uuid::new_v4(), note).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == INVALID_TAG_REF));
    }

    #[tokio::test]
    async fn create_dedupes_tags() {
        let (notes, store) = service();
        let owner = Uuid::new_v4();
        let tag = store.insert_tag(owner, "t".into()).await.unwrap();
        let note = NewNote {
            tags: vec![tag.id, tag.id],
            ..titled("x")
        };
        assert_eq!(notes.create(owner, note).await.unwrap().tags, vec![tag.id]);
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let (notes, _) = service();
        let err = notes
            .update(Uuid::new_v4(), Uuid::new_v4(), NotePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "No valid update fields in request body"));
    }

    #[tokio::test]
    async fn update_checks_only_supplied_references() {
        let (notes, store) = service();
        let owner = Uuid::new_v4();
        let folder = store.insert_folder(owner, "F".into()).await.unwrap();
        let created = notes
            .create(
                owner,
                NewNote {
                    folder_id: Some(folder.id),
                    ..titled("x")
                },
            )
            .await
            .unwrap();

        let retitled = notes
            .update(
                owner,
                created.id,
                NotePatch {
                    title: Some("y".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(retitled.title, "y");
        assert_eq!(retitled.folder_id, Some(folder.id));
        assert!(retitled.updated_at >= created.updated_at);

        let cleared = notes
            .update(
                owner,
                created.id,
                NotePatch {
                    folder_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.folder_id, None);

        let bad = notes
            .update(
                owner,
                created.id,
                NotePatch {
                    folder_id: Some(Some(Uuid::new_v4())),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn update_and_delete_outside_scope_are_not_found() {
        let (notes, _) = service();
        let owner = Uuid::new_v4();
        let note = notes.create(owner, titled("x")).await.unwrap();
        let stranger = Uuid::new_v4();

        let patch = NotePatch {
            title: Some("stolen".into()),
            ..Default::default()
        };
        assert!(matches!(notes.update(stranger, note.id, patch).await, Err(ServiceError::NotFound)));
        assert!(matches!(notes.delete(stranger, note.id).await, Err(ServiceError::NotFound)));
        notes.delete(owner, note.id).await.unwrap();
        assert!(matches!(notes.get(owner, note.id).await, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn list_filters_compose() {
        let (notes, store) = service();
        let owner = Uuid::new_v4();
        let folder = store.insert_folder(owner, "F".into()).await.unwrap();
        let tag = store.insert_tag(owner, "T".into()).await.unwrap();

        notes
            .create(
                owner,
                NewNote {
                    content: Some("about CATS".into()),
                    folder_id: Some(folder.id),
                    tags: vec![tag.id],
                    ..titled("one")
                },
            )
            .await
            .unwrap();
        notes
            .create(
                owner,
                NewNote {
                    folder_id: Some(folder.id),
                    ..titled("cats two")
                },
            )
            .await
            .unwrap();
        notes.create(owner, titled("dogs")).await.unwrap();

        let search = NoteQuery {
            search_term: Some("cat".into()),
            ..Default::default()
        };
        assert_eq!(notes.list(owner, &search).await.unwrap().len(), 2);

        let in_folder_with_tag = NoteQuery {
            search_term: Some("cat".into()),
            folder_id: Some(folder.id),
            tag_id: Some(tag.id),
        };
        let found = notes.list(owner, &in_folder_with_tag).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "one");

        assert!(notes.list(Uuid::new_v4(), &NoteQuery::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn expand_resolves_references_and_drops_dangling_ones() {
        let (notes, store) = service();
        let owner = Uuid::new_v4();
        let folder = store.insert_folder(owner, "F".into()).await.unwrap();
        let tag = store.insert_tag(owner, "T".into()).await.unwrap();
        let gone = Uuid::new_v4();
        let note = store
            .insert_note(
                owner,
                NewNote {
                    folder_id: Some(folder.id),
                    tags: vec![tag.id, gone],
                    ..titled("x")
                },
            )
            .await
            .unwrap();
        let bare = store.insert_note(owner, titled("y")).await.unwrap();

        let expanded = notes.expand(owner, vec![note, bare]).await.unwrap();
        assert_eq!(expanded[0].folder.as_ref(), Some(&folder));
        assert_eq!(expanded[0].tags, vec![tag]);
        assert_eq!(expanded[1].folder, None);
        assert!(expanded[1].tags.is_empty());
    }
}
