// handlers/protected/notes/delete.rs - DELETE /api/notes/:id handler

use axum::extract::{Extension, Path, State};

use crate::api::parse_id;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

pub async fn note_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id = parse_id(&id, "id")?;
    state.notes().delete(auth.id(), id).await?;
    Ok(ApiResponse::no_content())
}
