use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Folder, Tag};
use crate::services::ExpandedNote;

/// Read-side note: `tags` holds full tag objects and `folder` the full folder
/// (or `null`). Write responses serialize [`crate::database::models::Note`]
/// directly, where `tags` is a list of ids.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<Uuid>,
    pub folder: Option<Folder>,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ExpandedNote> for NoteView {
    fn from(expanded: ExpandedNote) -> Self {
        let ExpandedNote { note, folder, tags } = expanded;
        Self {
            id: note.id,
            user_id: note.user_id,
            title: note.title,
            content: note.content,
            folder_id: note.folder_id,
            folder,
            tags,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

pub fn note_views(expanded: Vec<ExpandedNote>) -> Vec<NoteView> {
    expanded.into_iter().map(NoteView::from).collect()
}
