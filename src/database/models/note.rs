use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::{FieldValue, Filterable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<Uuid>,
    pub tags: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a note insert
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewNote {
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<Uuid>,
    pub tags: Vec<Uuid>,
}

/// Partial note update. The outer `Option` is "field supplied", the inner one
/// (where present) is "set or clear".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<Option<String>>,
    pub folder_id: Option<Option<Uuid>>,
    pub tags: Option<Vec<Uuid>>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.folder_id.is_none() && self.tags.is_none()
    }

    /// Apply supplied fields to an existing note (the in-memory write path)
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(folder_id) = self.folder_id {
            note.folder_id = folder_id;
        }
        if let Some(tags) = &self.tags {
            note.tags = tags.clone();
        }
    }
}

impl Filterable for Note {
    fn field(&self, column: &str) -> FieldValue<'_> {
        match column {
            "id" => FieldValue::Uuid(Some(self.id)),
            "user_id" => FieldValue::Uuid(Some(self.user_id)),
            "title" => FieldValue::Text(Some(&self.title)),
            "content" => FieldValue::Text(self.content.as_deref()),
            "folder_id" => FieldValue::Uuid(self.folder_id),
            "tags" => FieldValue::UuidList(&self.tags),
            "created_at" => FieldValue::Timestamp(self.created_at),
            "updated_at" => FieldValue::Timestamp(self.updated_at),
            _ => FieldValue::Missing,
        }
    }
}
