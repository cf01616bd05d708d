// handlers/protected/folders/create.rs - POST /api/folders handler

use axum::extract::{Extension, State};

use crate::api::{input, JsonBody};
use crate::database::models::Folder;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/**
 * POST /api/folders - Create a folder
 *
 * Expected Input:
 * ```json
 * { "name": "string" }
 * ```
 *
 * Answers 201 with a `Location` header. A name the caller already uses
 * answers 400 `The folder name already exists`.
 */
pub async fn folder_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(body): JsonBody,
) -> Result<ApiResponse<Folder>, ApiError> {
    let name = input::entity_name(&body)?;
    let folder = state.folders().create(auth.id(), name).await?;
    let location = format!("/api/folders/{}", folder.id);
    Ok(ApiResponse::created(folder, location))
}
