// handlers/public/auth/login.rs - POST /api/login handler

use axum::extract::State;
use serde::Serialize;

use crate::api::{input, JsonBody};
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub auth_token: String,
}

/**
 * POST /api/login - Authenticate user and receive JWT token
 *
 * Expected Input:
 * ```json
 * { "username": "string", "password": "string" }
 * ```
 *
 * Expected Output (Success):
 * ```json
 * { "authToken": "eyJhbGciOiJIUzI1NiI..." }
 * ```
 *
 * Unknown usernames and wrong passwords both answer 401 `Unauthorized`.
 */
pub async fn login_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<ApiResponse<TokenResponse>, ApiError> {
    let (username, password) = input::credentials(&body)?;
    let auth_token = state.users().authenticate(&username, &password).await?;
    Ok(ApiResponse::success(TokenResponse { auth_token }))
}
