// handlers/protected/notes/update.rs - PUT /api/notes/:id handler

use axum::extract::{Extension, Path, State};

use crate::api::{input, parse_id, JsonBody};
use crate::database::models::Note;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/// Partial update over `title`, `content`, `folderId` and `tags`. Other keys
/// are ignored; a body with none of them answers 400.
pub async fn note_update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<ApiResponse<Note>, ApiError> {
    let id = parse_id(&id, "id")?;
    let patch = input::note_patch(&body)?;
    let note = state.notes().update(auth.id(), id, patch).await?;
    Ok(ApiResponse::success(note))
}
