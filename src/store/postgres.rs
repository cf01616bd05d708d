use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{FolderStore, NoteStore, Store, StoreError, TagStore, UserStore};
use crate::database::models::{Folder, NewNote, NewUser, Note, NotePatch, Tag, User};
use crate::database::repository::Repository;
use crate::database::DatabaseManager;
use crate::filter::scope::{FOLDERS, NOTES, TAGS};
use crate::filter::Filter;

/// Postgres-backed store. Reads and deletes go through filter-driven
/// repositories; inserts and updates are fixed statements with `RETURNING *`.
pub struct PgStore {
    pool: PgPool,
    folders: Repository<Folder>,
    tags: Repository<Tag>,
    notes: Repository<Note>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            folders: Repository::new(FOLDERS, pool.clone()),
            tags: Repository::new(TAGS, pool.clone()),
            notes: Repository::new(NOTES, pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, fullname, password) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user.username)
        .bind(user.fullname)
        .bind(user.password_digest)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl FolderStore for PgStore {
    async fn list_folders(&self, filter: Filter) -> Result<Vec<Folder>, StoreError> {
        Ok(self.folders.select_any(filter).await?)
    }

    async fn find_folder(&self, filter: Filter) -> Result<Option<Folder>, StoreError> {
        Ok(self.folders.select_one(filter).await?)
    }

    async fn count_folders(&self, filter: Filter) -> Result<i64, StoreError> {
        Ok(self.folders.count(filter).await?)
    }

    async fn insert_folder(&self, owner: Uuid, name: String) -> Result<Folder, StoreError> {
        let row = sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, user_id, name) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_folder(
        &self,
        owner: Uuid,
        id: Uuid,
        name: String,
    ) -> Result<Option<Folder>, StoreError> {
        let row = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $3, updated_at = now() WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_folders(&self, filter: Filter) -> Result<u64, StoreError> {
        Ok(self.folders.delete_any(filter).await?)
    }
}

#[async_trait]
impl TagStore for PgStore {
    async fn list_tags(&self, filter: Filter) -> Result<Vec<Tag>, StoreError> {
        Ok(self.tags.select_any(filter).await?)
    }

    async fn find_tag(&self, filter: Filter) -> Result<Option<Tag>, StoreError> {
        Ok(self.tags.select_one(filter).await?)
    }

    async fn count_tags(&self, filter: Filter) -> Result<i64, StoreError> {
        Ok(self.tags.count(filter).await?)
    }

    async fn insert_tag(&self, owner: Uuid, name: String) -> Result<Tag, StoreError> {
        let row = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (id, user_id, name) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_tag(
        &self,
        owner: Uuid,
        id: Uuid,
        name: String,
    ) -> Result<Option<Tag>, StoreError> {
        let row = sqlx::query_as::<_, Tag>(
            "UPDATE tags SET name = $3, updated_at = now() WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_tags(&self, filter: Filter) -> Result<u64, StoreError> {
        Ok(self.tags.delete_any(filter).await?)
    }
}

#[async_trait]
impl NoteStore for PgStore {
    async fn list_notes(&self, filter: Filter) -> Result<Vec<Note>, StoreError> {
        Ok(self.notes.select_any(filter).await?)
    }

    async fn find_note(&self, filter: Filter) -> Result<Option<Note>, StoreError> {
        Ok(self.notes.select_one(filter).await?)
    }

    async fn insert_note(&self, owner: Uuid, note: NewNote) -> Result<Note, StoreError> {
        let row = sqlx::query_as::<_, Note>(
            "INSERT INTO notes (id, user_id, title, content, folder_id, tags) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(note.title)
        .bind(note.content)
        .bind(note.folder_id)
        .bind(note.tags)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_note(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: NotePatch,
    ) -> Result<Option<Note>, StoreError> {
        let sql = note_update_sql(&patch);
        let mut q = sqlx::query_as::<_, Note>(&sql).bind(id).bind(owner);
        if let Some(title) = patch.title {
            q = q.bind(title);
        }
        if let Some(content) = patch.content {
            q = q.bind(content);
        }
        if let Some(folder_id) = patch.folder_id {
            q = q.bind(folder_id);
        }
        if let Some(tags) = patch.tags {
            q = q.bind(tags);
        }
        Ok(q.fetch_optional(&self.pool).await?)
    }

    async fn delete_notes(&self, filter: Filter) -> Result<u64, StoreError> {
        Ok(self.notes.delete_any(filter).await?)
    }

    async fn pull_tag_from_notes(&self, owner: Uuid, tag_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE notes SET tags = array_remove(tags, $2), updated_at = now() \
             WHERE user_id = $1 AND $2 = ANY(tags)",
        )
        .bind(owner)
        .bind(tag_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await?;
        Ok(())
    }
}

/// SET list for a partial note update; `$1` is the id, `$2` the owner, and the
/// supplied fields follow in title, content, folder_id, tags order.
fn note_update_sql(patch: &NotePatch) -> String {
    let supplied = [
        ("title", patch.title.is_some()),
        ("content", patch.content.is_some()),
        ("folder_id", patch.folder_id.is_some()),
        ("tags", patch.tags.is_some()),
    ];

    let mut sets: Vec<String> = supplied
        .iter()
        .filter(|(_, present)| *present)
        .enumerate()
        .map(|(i, (column, _))| format!("\"{}\" = ${}", column, i + 3))
        .collect();
    sets.push("updated_at = now()".to_string());

    format!(
        "UPDATE notes SET {} WHERE id = $1 AND user_id = $2 RETURNING *",
        sets.join(", ")
    )
}
