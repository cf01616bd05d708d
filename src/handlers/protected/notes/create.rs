// handlers/protected/notes/create.rs - POST /api/notes handler

use axum::extract::{Extension, State};

use crate::api::{input, JsonBody};
use crate::database::models::Note;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/**
 * POST /api/notes - Create a note
 *
 * Expected Input:
 * ```json
 * {
 *   "title": "string",          // Required
 *   "content": "string",        // Optional
 *   "folderId": "uuid",         // Optional, must be one of the caller's folders
 *   "tags": ["uuid", "uuid"]    // Optional, each must be one of the caller's tags
 * }
 * ```
 *
 * Answers 201 with a `Location` header; nothing is stored when a reference
 * fails to resolve.
 */
pub async fn note_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(body): JsonBody,
) -> Result<ApiResponse<Note>, ApiError> {
    let new_note = input::new_note(&body)?;
    let note = state.notes().create(auth.id(), new_note).await?;
    let location = format!("/api/notes/{}", note.id);
    Ok(ApiResponse::created(note, location))
}
