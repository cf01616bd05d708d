// handlers/protected/tags/show.rs - GET /api/tags/:id handler

use axum::extract::{Extension, Path, State};

use crate::api::parse_id;
use crate::database::models::Tag;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

pub async fn tag_show(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Tag>, ApiError> {
    let id = parse_id(&id, "id")?;
    let tag = state.tags().get(auth.id(), id).await?;
    Ok(ApiResponse::success(tag))
}
