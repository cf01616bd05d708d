// handlers/protected/folders/update.rs - PUT /api/folders/:id handler

use axum::extract::{Extension, Path, State};

use crate::api::{input, parse_id, JsonBody};
use crate::database::models::Folder;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/// Rename a folder. `name` is required; collisions answer 400.
pub async fn folder_update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<ApiResponse<Folder>, ApiError> {
    let id = parse_id(&id, "id")?;
    let name = input::entity_name(&body)?;
    let folder = state.folders().rename(auth.id(), id, name).await?;
    Ok(ApiResponse::success(folder))
}
