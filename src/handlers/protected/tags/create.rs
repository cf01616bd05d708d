// handlers/protected/tags/create.rs - POST /api/tags handler

use axum::extract::{Extension, State};

use crate::api::{input, JsonBody};
use crate::database::models::Tag;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/**
 * POST /api/tags - Create a tag
 *
 * Expected Input:
 * ```json
 * { "name": "string" }
 * ```
 *
 * Answers 201 with a `Location` header. A name the caller already uses
 * answers 400 `The tag name already exists`.
 */
pub async fn tag_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(body): JsonBody,
) -> Result<ApiResponse<Tag>, ApiError> {
    let name = input::entity_name(&body)?;
    let tag = state.tags().create(auth.id(), name).await?;
    let location = format!("/api/tags/{}", tag.id);
    Ok(ApiResponse::created(tag, location))
}
