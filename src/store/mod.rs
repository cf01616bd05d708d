//! Persistence seam. Services talk to `dyn Store`; the Postgres backend serves
//! production and the in-memory backend serves `STORE_BACKEND=memory` and tests.
//! Both evaluate the same [`Filter`] values, so owner scoping is expressed once.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Folder, NewNote, NewUser, Note, NotePatch, Tag, User};
use crate::filter::{Filter, FilterError};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub const USERS_USERNAME_KEY: &str = "users_username_key";
pub const FOLDERS_NAME_KEY: &str = "folders_user_id_name_key";
pub const TAGS_NAME_KEY: &str = "tags_user_id_name_key";

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write; carries the constraint name
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Invalid query: {0}")]
    Filter(#[from] FilterError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Sqlx(sqlx_err) => StoreError::from(sqlx_err),
            other => StoreError::Database(other),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                StoreError::Conflict(db.constraint().unwrap_or("unique").to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Database(DatabaseError::Sqlx(err)),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait FolderStore: Send + Sync {
    async fn list_folders(&self, filter: Filter) -> Result<Vec<Folder>, StoreError>;

    async fn find_folder(&self, filter: Filter) -> Result<Option<Folder>, StoreError>;

    async fn count_folders(&self, filter: Filter) -> Result<i64, StoreError>;

    async fn insert_folder(&self, owner: Uuid, name: String) -> Result<Folder, StoreError>;

    /// Rename inside the owner's scope; `None` when no such folder
    async fn update_folder(
        &self,
        owner: Uuid,
        id: Uuid,
        name: String,
    ) -> Result<Option<Folder>, StoreError>;

    async fn delete_folders(&self, filter: Filter) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait TagStore: Send + Sync {
    async fn list_tags(&self, filter: Filter) -> Result<Vec<Tag>, StoreError>;

    async fn find_tag(&self, filter: Filter) -> Result<Option<Tag>, StoreError>;

    async fn count_tags(&self, filter: Filter) -> Result<i64, StoreError>;

    async fn insert_tag(&self, owner: Uuid, name: String) -> Result<Tag, StoreError>;

    async fn update_tag(&self, owner: Uuid, id: Uuid, name: String)
        -> Result<Option<Tag>, StoreError>;

    async fn delete_tags(&self, filter: Filter) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn list_notes(&self, filter: Filter) -> Result<Vec<Note>, StoreError>;

    async fn find_note(&self, filter: Filter) -> Result<Option<Note>, StoreError>;

    async fn insert_note(&self, owner: Uuid, note: NewNote) -> Result<Note, StoreError>;

    async fn update_note(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: NotePatch,
    ) -> Result<Option<Note>, StoreError>;

    async fn delete_notes(&self, filter: Filter) -> Result<u64, StoreError>;

    /// Remove `tag_id` from every note of `owner` that carries it, refreshing
    /// `updated_at` on the touched notes. Returns the number of notes modified.
    async fn pull_tag_from_notes(&self, owner: Uuid, tag_id: Uuid) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait Store: UserStore + FolderStore + TagStore + NoteStore {
    /// Short backend name reported by `/health`
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), StoreError>;
}
