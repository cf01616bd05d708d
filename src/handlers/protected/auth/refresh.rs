// handlers/protected/auth/refresh.rs - POST /api/refresh handler

use axum::extract::{Extension, State};

use crate::error::ApiError;
use crate::handlers::public::TokenResponse;
use crate::middleware::{ApiResponse, AuthUser};
use crate::state::AppState;

/**
 * POST /api/refresh - Exchange a valid token for one with a fresh expiry
 *
 * Requires `Authorization: Bearer <token>`; the identity claims are carried
 * over unchanged.
 */
pub async fn refresh_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<TokenResponse>, ApiError> {
    let auth_token = state.users().refresh(auth.user)?;
    Ok(ApiResponse::success(TokenResponse { auth_token }))
}
