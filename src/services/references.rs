use std::collections::HashSet;

use uuid::Uuid;

use super::ServiceError;
use crate::filter::scope::{self, FOLDERS, TAGS};
use crate::store::Store;

pub const INVALID_FOLDER_REF: &str = "The `folderId` is not valid";
pub const INVALID_TAG_REF: &str = "The `tags` array contains an invalid `id`";

/// A note may only point at a folder its owner holds. `None` is always valid.
pub async fn validate_folder_ref(
    store: &dyn Store,
    owner: Uuid,
    folder_id: Option<Uuid>,
) -> Result<(), ServiceError> {
    let Some(folder_id) = folder_id else {
        return Ok(());
    };

    let found = store
        .count_folders(scope::owned_by_id(FOLDERS, owner, folder_id)?)
        .await?;
    if found == 0 {
        return Err(ServiceError::validation(INVALID_FOLDER_REF));
    }
    Ok(())
}

/// Every referenced tag must exist under `owner`. Duplicates count once.
pub async fn validate_tag_refs(
    store: &dyn Store,
    owner: Uuid,
    tag_ids: Option<&[Uuid]>,
) -> Result<(), ServiceError> {
    let Some(tag_ids) = tag_ids else {
        return Ok(());
    };

    let unique = dedupe(tag_ids);
    if unique.is_empty() {
        return Ok(());
    }

    let found = store
        .count_tags(scope::owned_by_ids(TAGS, owner, &unique)?)
        .await?;
    if (found as usize) < unique.len() {
        return Err(ServiceError::validation(INVALID_TAG_REF));
    }
    Ok(())
}

/// Order-preserving de-duplication
pub fn dedupe(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
