/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * # Security
 *
 * - Unknown email and wrong password both return 401
 *   `InvalidCredentialsError` with the same message
 * - Each login mints a new refresh token; existing sessions on other
 *   devices stay valid
 */

use axum::{extract::State, response::Json};
use axum_extra::extract::{CookieJar, WithRejection};

use crate::backend::auth::cookies::set_session_cookies;
use crate::backend::auth::handlers::types::{user_response, JsonBody, LoginRequest, UserResponse};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(request), _): JsonBody<LoginRequest>,
) -> Result<(CookieJar, UserResponse), BackendError> {
    let session = state.auth.login_user(&request.email, &request.password).await?;

    let jar = set_session_cookies(jar, &session, state.cookies);
    Ok((jar, user_response("Successfully logged in", session.user)))
}
