// handlers/protected/notes/list.rs - GET /api/notes handler

use std::collections::HashMap;

use axum::extract::{Extension, Query, State};

use crate::api::{input, note_views, NoteView};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/**
 * GET /api/notes - Caller's notes, most recently updated first
 *
 * Query parameters, all optional and combined with AND:
 * - `searchTerm`: case-insensitive substring of title or content
 * - `folderId`: notes filed in this folder
 * - `tagId`: notes carrying this tag
 *
 * Malformed ids answer 400 before any lookup.
 */
pub async fn note_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ApiResponse<Vec<NoteView>>, ApiError> {
    let query = input::note_query(&params)?;
    let notes = state.notes();
    let found = notes.list(auth.id(), &query).await?;
    let expanded = notes.expand(auth.id(), found).await?;
    Ok(ApiResponse::success(note_views(expanded)))
}
