// handlers/protected/folders/list.rs - GET /api/folders handler

use axum::extract::{Extension, State};

use crate::database::models::Folder;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/// Caller's folders sorted by name
pub async fn folder_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<Folder>>, ApiError> {
    let folders = state.folders().list(auth.id()).await?;
    Ok(ApiResponse::success(folders))
}
