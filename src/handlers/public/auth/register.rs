// handlers/public/auth/register.rs - POST /api/users handler

use axum::extract::State;

use crate::api::{input, JsonBody};
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

/**
 * POST /api/users - Register new user account
 *
 * Expected Input:
 * ```json
 * {
 *   "username": "string",   // Required, no surrounding whitespace
 *   "password": "string",   // Required, 8 to 72 characters
 *   "fullname": "string"    // Optional, trimmed before storing
 * }
 * ```
 *
 * Expected Output (201, `Location: /api/users/:id`):
 * ```json
 * { "id": "uuid", "username": "bobuser", "fullname": "Bob User" }
 * ```
 *
 * Duplicate usernames answer 400 `The username already exists`.
 */
pub async fn register_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<ApiResponse<User>, ApiError> {
    let registration = input::registration(&body)?;
    let user = state.users().register(registration).await?;
    let location = format!("/api/users/{}", user.id);
    Ok(ApiResponse::created(user, location))
}
