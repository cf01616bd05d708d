// handlers/protected/tags/update.rs - PUT /api/tags/:id handler

use axum::extract::{Extension, Path, State};

use crate::api::{input, parse_id, JsonBody};
use crate::database::models::Tag;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/// Rename a tag. `name` is required; collisions answer 400.
pub async fn tag_update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<ApiResponse<Tag>, ApiError> {
    let id = parse_id(&id, "id")?;
    let name = input::entity_name(&body)?;
    let tag = state.tags().rename(auth.id(), id, name).await?;
    Ok(ApiResponse::success(tag))
}
