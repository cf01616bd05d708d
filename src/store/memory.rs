use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    FolderStore, NoteStore, Store, StoreError, TagStore, UserStore, FOLDERS_NAME_KEY,
    TAGS_NAME_KEY, USERS_USERNAME_KEY,
};
use crate::database::models::{Folder, NewNote, NewUser, Note, NotePatch, Tag, User};
use crate::filter::Filter;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    folders: HashMap<Uuid, Folder>,
    tags: HashMap<Uuid, Tag>,
    notes: HashMap<Uuid, Note>,
}

/// Process-local store. Enforces the same unique keys as the Postgres schema.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn select<T: crate::filter::Filterable + Clone>(
    rows: &HashMap<Uuid, T>,
    filter: &Filter,
) -> Vec<T> {
    filter.apply(rows.values().cloned())
}

fn remove_matching<T: crate::filter::Filterable>(rows: &mut HashMap<Uuid, T>, filter: &Filter) -> u64 {
    let before = rows.len();
    rows.retain(|_, row| !filter.matches(&*row));
    (before - rows.len()) as u64
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(USERS_USERNAME_KEY.to_string()));
        }
        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            username: user.username,
            fullname: user.fullname,
            password: user.password_digest,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl FolderStore for MemoryStore {
    async fn list_folders(&self, filter: Filter) -> Result<Vec<Folder>, StoreError> {
        Ok(select(&self.tables.read().await.folders, &filter))
    }

    async fn find_folder(&self, filter: Filter) -> Result<Option<Folder>, StoreError> {
        Ok(select(&self.tables.read().await.folders, &filter).into_iter().next())
    }

    async fn count_folders(&self, filter: Filter) -> Result<i64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.folders.values().filter(|f| filter.matches(*f)).count() as i64)
    }

    async fn insert_folder(&self, owner: Uuid, name: String) -> Result<Folder, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.folders.values().any(|f| f.user_id == owner && f.name == name) {
            return Err(StoreError::Conflict(FOLDERS_NAME_KEY.to_string()));
        }
        let now = Utc::now();
        let folder = Folder {
            id: Uuid::new_v4(),
            user_id: owner,
            name,
            created_at: now,
            updated_at: now,
        };
        tables.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn update_folder(
        &self,
        owner: Uuid,
        id: Uuid,
        name: String,
    ) -> Result<Option<Folder>, StoreError> {
        let mut tables = self.tables.write().await;
        // Scope first: an id outside the owner's rows is not found, whatever the name
        if !tables.folders.get(&id).is_some_and(|f| f.user_id == owner) {
            return Ok(None);
        }
        if tables
            .folders
            .values()
            .any(|f| f.user_id == owner && f.id != id && f.name == name)
        {
            return Err(StoreError::Conflict(FOLDERS_NAME_KEY.to_string()));
        }
        let Some(folder) = tables.folders.get_mut(&id) else {
            return Ok(None);
        };
        folder.name = name;
        folder.updated_at = Utc::now();
        Ok(Some(folder.clone()))
    }

    async fn delete_folders(&self, filter: Filter) -> Result<u64, StoreError> {
        Ok(remove_matching(&mut self.tables.write().await.folders, &filter))
    }
}

#[async_trait]
impl TagStore for MemoryStore {
    async fn list_tags(&self, filter: Filter) -> Result<Vec<Tag>, StoreError> {
        Ok(select(&self.tables.read().await.tags, &filter))
    }

    async fn find_tag(&self, filter: Filter) -> Result<Option<Tag>, StoreError> {
        Ok(select(&self.tables.read().await.tags, &filter).into_iter().next())
    }

    async fn count_tags(&self, filter: Filter) -> Result<i64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.values().filter(|t| filter.matches(*t)).count() as i64)
    }

    async fn insert_tag(&self, owner: Uuid, name: String) -> Result<Tag, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.tags.values().any(|t| t.user_id == owner && t.name == name) {
            return Err(StoreError::Conflict(TAGS_NAME_KEY.to_string()));
        }
        let now = Utc::now();
        let tag = Tag {
            id: Uuid::new_v4(),
            user_id: owner,
            name,
            created_at: now,
            updated_at: now,
        };
        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn update_tag(
        &self,
        owner: Uuid,
        id: Uuid,
        name: String,
    ) -> Result<Option<Tag>, StoreError> {
        let mut tables = self.tables.write().await;
        // Scope first: an id outside the owner's rows is not found, whatever the name
        if !tables.tags.get(&id).is_some_and(|t| t.user_id == owner) {
            return Ok(None);
        }
        if tables
            .tags
            .values()
            .any(|t| t.user_id == owner && t.id != id && t.name == name)
        {
            return Err(StoreError::Conflict(TAGS_NAME_KEY.to_string()));
        }
        let Some(tag) = tables.tags.get_mut(&id) else {
            return Ok(None);
        };
        tag.name = name;
        tag.updated_at = Utc::now();
        Ok(Some(tag.clone()))
    }

    async fn delete_tags(&self, filter: Filter) -> Result<u64, StoreError> {
        Ok(remove_matching(&mut self.tables.write().await.tags, &filter))
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list_notes(&self, filter: Filter) -> Result<Vec<Note>, StoreError> {
        Ok(select(&self.tables.read().await.notes, &filter))
    }

    async fn find_note(&self, filter: Filter) -> Result<Option<Note>, StoreError> {
        Ok(select(&self.tables.read().await.notes, &filter).into_iter().next())
    }

    async fn insert_note(&self, owner: Uuid, note: NewNote) -> Result<Note, StoreError> {
        let now = Utc::now();
        let record = Note {
            id: Uuid::new_v4(),
            user_id: owner,
            title: note.title,
            content: note.content,
            folder_id: note.folder_id,
            tags: note.tags,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.notes.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_note(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: NotePatch,
    ) -> Result<Option<Note>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(note) = tables.notes.get_mut(&id).filter(|n| n.user_id == owner) else {
            return Ok(None);
        };
        patch.apply_to(note);
        note.updated_at = Utc::now();
        Ok(Some(note.clone()))
    }

    async fn delete_notes(&self, filter: Filter) -> Result<u64, StoreError> {
        Ok(remove_matching(&mut self.tables.write().await.notes, &filter))
    }

    async fn pull_tag_from_notes(&self, owner: Uuid, tag_id: Uuid) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let mut modified = 0;
        for note in tables
            .notes
            .values_mut()
            .filter(|n| n.user_id == owner && n.tags.contains(&tag_id))
        {
            note.tags.retain(|t| *t != tag_id);
            note.updated_at = now;
            modified += 1;
        }
        Ok(modified)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::scope::{self, FOLDERS, NOTES};

    fn new_note(title: &str, folder_id: Option<Uuid>, tags: Vec<Uuid>) -> NewNote {
        NewNote {
            title: title.to_string(),
            content: None,
            folder_id,
            tags,
        }
    }

    #[tokio::test]
    async fn folder_names_are_unique_per_owner() {
        let store = MemoryStore::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

        store.insert_folder(alice, "Work".into()).await.unwrap();
        store.insert_folder(bob, "Work".into()).await.unwrap();
        let err = store.insert_folder(alice, "Work".into()).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref key) if key == FOLDERS_NAME_KEY));

        let count = store
            .count_folders(scope::owned(FOLDERS, alice).unwrap())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn rename_to_own_name_is_not_a_conflict() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let folder = store.insert_folder(owner, "Work".into()).await.unwrap();
        store.insert_folder(owner, "Home".into()).await.unwrap();

        let same = store.update_folder(owner, folder.id, "Work".into()).await.unwrap();
        assert!(same.is_some());
        let clash = store.update_folder(owner, folder.id, "Home".into()).await;
        assert!(matches!(clash, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_outside_owner_scope_finds_nothing() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let tag = store.insert_tag(owner, "rust".into()).await.unwrap();
        let other = store.update_tag(Uuid::new_v4(), tag.id, "go".into()).await.unwrap();
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryStore::new();
        let user = NewUser {
            username: "bobuser".into(),
            fullname: None,
            password_digest: "digest".into(),
        };
        store.insert_user(user.clone()).await.unwrap();
        let err = store.insert_user(user).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref key) if key == USERS_USERNAME_KEY));
    }

    #[tokio::test]
    async fn pull_tag_only_touches_owner_notes_carrying_it() {
        let store = MemoryStore::new();
        let (owner, other) = (Uuid::new_v4(), Uuid::new_v4());
        let (tag, keep) = (Uuid::new_v4(), Uuid::new_v4());

        let tagged = store.insert_note(owner, new_note("a", None, vec![tag, keep])).await.unwrap();
        let untouched = store.insert_note(owner, new_note("b", None, vec![keep])).await.unwrap();
        store.insert_note(other, new_note("c", None, vec![tag])).await.unwrap();

        let modified = store.pull_tag_from_notes(owner, tag).await.unwrap();
        assert_eq!(modified, 1);

        let after = store
            .find_note(scope::owned_by_id(NOTES, owner, tagged.id).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.tags, vec![keep]);
        assert!(after.updated_at >= tagged.updated_at);

        let same = store
            .find_note(scope::owned_by_id(NOTES, owner, untouched.id).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(same, untouched);

        let foreign = store
            .list_notes(scope::owned(NOTES, other).unwrap())
            .await
            .unwrap();
        assert_eq!(foreign[0].tags, vec![tag]);
    }

    #[tokio::test]
    async fn delete_by_filter_is_scoped() {
        let store = MemoryStore::new();
        let (owner, other) = (Uuid::new_v4(), Uuid::new_v4());
        let folder = Uuid::new_v4();
        store.insert_note(owner, new_note("a", Some(folder), vec![])).await.unwrap();
        store.insert_note(owner, new_note("b", None, vec![])).await.unwrap();
        store.insert_note(other, new_note("c", Some(folder), vec![])).await.unwrap();

        let filter = scope::owned(NOTES, owner).unwrap().where_eq("folder_id", folder).unwrap();
        assert_eq!(store.delete_notes(filter).await.unwrap(), 1);
        assert_eq!(store.list_notes(scope::owned(NOTES, owner).unwrap()).await.unwrap().len(), 1);
        assert_eq!(store.list_notes(scope::owned(NOTES, other).unwrap()).await.unwrap().len(), 1);
    }
}
