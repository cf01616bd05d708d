use uuid::Uuid;

use super::error::FilterError;
use super::filter::{field, Filter};
use super::types::{Condition, FilterOp};

pub const FOLDERS: &str = "folders";
pub const TAGS: &str = "tags";
pub const NOTES: &str = "notes";

/// Every query against an owned table starts here
pub fn owned(table: &str, owner: Uuid) -> Result<Filter, FilterError> {
    Filter::new(table)?.where_eq("user_id", owner)
}

/// Single row by id inside the owner's scope
pub fn owned_by_id(table: &str, owner: Uuid, id: Uuid) -> Result<Filter, FilterError> {
    owned(table, owner)?.where_eq("id", id)
}

/// Rows of `table` owned by `owner` whose id is in `ids`
pub fn owned_by_ids(table: &str, owner: Uuid, ids: &[Uuid]) -> Result<Filter, FilterError> {
    owned(table, owner)?.where_field("id", FilterOp::In, ids.to_vec())
}

/// Optional note list filters, already shape-checked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteQuery {
    pub search_term: Option<String>,
    pub folder_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
}

impl NoteQuery {
    pub fn to_filter(&self, owner: Uuid) -> Result<Filter, FilterError> {
        let mut filter = owned(NOTES, owner)?;

        if let Some(term) = self.search_term.as_deref().filter(|t| !t.is_empty()) {
            filter = filter.where_condition(Condition::Or(vec![
                field("title", FilterOp::ILike, term),
                field("content", FilterOp::ILike, term),
            ]))?;
        }
        if let Some(folder_id) = self.folder_id {
            filter = filter.where_eq("folder_id", folder_id)?;
        }
        if let Some(tag_id) = self.tag_id {
            filter = filter.where_field("tags", FilterOp::Contains, tag_id)?;
        }

        filter.order("updated_at desc")
    }
}
