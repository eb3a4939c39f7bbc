/**
 * Get Current User Handler
 *
 * GET /api/auth/me
 *
 * Mounted behind `require_auth`, so the identity comes from the verified
 * access token. The avatar is resolved against the configured default and
 * public base URL.
 *
 * # Errors
 *
 * * `401 Unauthenticated` - missing, invalid or expired access token
 * * `404 NotFoundError` - the account no longer exists
 */

use axum::extract::State;

use crate::backend::auth::handlers::types::{user_response, UserResponse};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<UserResponse, BackendError> {
    let me = state.auth.get_me(user.user_id).await?;
    Ok(user_response("Fetched current user", me))
}
