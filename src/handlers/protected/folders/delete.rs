// handlers/protected/folders/delete.rs - DELETE /api/folders/:id handler

use axum::extract::{Extension, Path, State};

use crate::api::parse_id;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/// Delete a folder and the caller's notes filed under it; 204 on success
pub async fn folder_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id = parse_id(&id, "id")?;
    state.folders().delete(auth.id(), id).await?;
    Ok(ApiResponse::no_content())
}
