use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{conflict_as, ServiceError};
use crate::database::models::Tag;
use crate::filter::scope::{self, TAGS};
use crate::store::Store;

pub const TAG_NAME_TAKEN: &str = "The tag name already exists";

pub struct TagService {
    store: Arc<dyn Store>,
}

impl TagService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self, owner: Uuid) -> Result<Vec<Tag>, ServiceError> {
        let filter = scope::owned(TAGS, owner)?.order("name asc")?;
        Ok(self.store.list_tags(filter).await?)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<Tag, ServiceError> {
        self.store
            .find_tag(scope::owned_by_id(TAGS, owner, id)?)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn create(&self, owner: Uuid, name: String) -> Result<Tag, ServiceError> {
        let tag = self
            .store
            .insert_tag(owner, name)
            .await
            .map_err(conflict_as(TAG_NAME_TAKEN))?;
        info!("Created tag {} for user {}", tag.id, owner);
        Ok(tag)
    }

    pub async fn rename(&self, owner: Uuid, id: Uuid, name: String) -> Result<Tag, ServiceError> {
        self.store
            .update_tag(owner, id, name)
            .await
            .map_err(conflict_as(TAG_NAME_TAKEN))?
            .ok_or(ServiceError::NotFound)
    }

    /// Remove the tag, then pull it out of the owner's notes. The notes
    /// themselves survive. Returns how many notes were modified.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<u64, ServiceError> {
        let removed = self
            .store
            .delete_tags(scope::owned_by_id(TAGS, owner, id)?)
            .await?;
        if removed == 0 {
            return Err(ServiceError::NotFound);
        }

        let modified = self.store.pull_tag_from_notes(owner, id).await?;
        info!(
            "Deleted tag {} for user {}; removed from {} note(s)",
            id, owner, modified
        );
        Ok(modified)
    }
}
