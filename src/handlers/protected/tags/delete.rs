// handlers/protected/tags/delete.rs - DELETE /api/tags/:id handler

use axum::extract::{Extension, Path, State};

use crate::api::parse_id;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/// Delete a tag and pull it from the caller's notes. Always 204, however
/// many notes were touched.
pub async fn tag_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id = parse_id(&id, "id")?;
    state.tags().delete(auth.id(), id).await?;
    Ok(ApiResponse::no_content())
}
