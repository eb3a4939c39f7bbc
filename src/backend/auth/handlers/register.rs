/**
 * Register Handler
 *
 * POST /api/auth/register
 *
 * # Registration Process
 *
 * 1. Validate username, email and password
 * 2. Hash the password (bcrypt, blocking pool)
 * 3. Insert the user; duplicate email or username is a 409
 * 4. Mint an access token and a refresh token
 * 5. Set both cookies and return `201 {message, data: user}`
 */

use axum::{extract::State, http::StatusCode, response::Json};
use axum_extra::extract::{CookieJar, WithRejection};

use crate::backend::auth::cookies::set_session_cookies;
use crate::backend::auth::handlers::types::{user_response, JsonBody, RegisterRequest, UserResponse};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(request), _): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, UserResponse), BackendError> {
    tracing::info!(username = %request.username, "register request");

    let session = state
        .auth
        .register_user(&request.username, &request.email, &request.password)
        .await?;

    let jar = set_session_cookies(jar, &session, state.cookies);
    Ok((
        StatusCode::CREATED,
        jar,
        user_response("Successfully registered", session.user),
    ))
}
