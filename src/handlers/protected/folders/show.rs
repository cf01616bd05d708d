// handlers/protected/folders/show.rs - GET /api/folders/:id handler

use axum::extract::{Extension, Path, State};

use crate::api::parse_id;
use crate::database::models::Folder;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/**
 * GET /api/folders/:id
 *
 * 400 for a malformed id, 404 when the folder does
 * not exist or belongs to someone else.
 */
pub async fn folder_show(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Folder>, ApiError> {
    let id = parse_id(&id, "id")?;
    let folder = state.folders().get(auth.id(), id).await?;
    Ok(ApiResponse::success(folder))
}
