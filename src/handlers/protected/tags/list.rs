// handlers/protected/tags/list.rs - GET /api/tags handler

use axum::extract::{Extension, State};

use crate::database::models::Tag;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

pub async fn tag_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<Tag>>, ApiError> {
    let tags = state.tags().list(auth.id()).await?;
    Ok(ApiResponse::success(tags))
}
