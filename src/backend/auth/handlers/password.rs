/**
 * Change Password Handler
 *
 * POST /api/auth/password
 *
 * Verifies the current password, stores the new hash, revokes every
 * refresh token of the account and hands the caller a fresh session.
 * Other devices are signed out at their next refresh.
 */

use axum::{extract::State, response::Json};
use axum_extra::extract::{CookieJar, WithRejection};

use crate::backend::auth::cookies::set_session_cookies;
use crate::backend::auth::handlers::types::{user_response, ChangePasswordRequest, JsonBody, UserResponse};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
    WithRejection(Json(request), _): JsonBody<ChangePasswordRequest>,
) -> Result<(CookieJar, UserResponse), BackendError> {
    let session = state
        .auth
        .change_password(user.user_id, &request.current_password, &request.new_password)
        .await?;

    let jar = set_session_cookies(jar, &session, state.cookies);
    Ok((jar, user_response("Password changed", session.user)))
}
