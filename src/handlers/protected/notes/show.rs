// handlers/protected/notes/show.rs - GET /api/notes/:id handler

use axum::extract::{Extension, Path, State};

use crate::api::{parse_id, NoteView};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

pub async fn note_show(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<NoteView>, ApiError> {
    let id = parse_id(&id, "id")?;
    let notes = state.notes();
    let note = notes.get(auth.id(), id).await?;
    let expanded = notes
        .expand(auth.id(), vec![note])
        .await?
        .pop()
        .ok_or_else(|| ApiError::not_found("Not Found"))?;
    Ok(ApiResponse::success(NoteView::from(expanded)))
}
