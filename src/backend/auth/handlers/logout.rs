//! POST /api/auth/logout
//!
//! Not gated by the access-token middleware: a client whose access token
//! already expired must still be able to drop its refresh token. Missing or
//! unknown refresh tokens are not an error.

use axum::{extract::State, response::Json};
use axum_extra::extract::CookieJar;

use crate::backend::auth::cookies::{clear_session_cookies, refresh_token_from};
use crate::backend::auth::handlers::types::EmptyResponse;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::auth::ApiEnvelope;

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, EmptyResponse), BackendError> {
    let raw = refresh_token_from(&jar);
    state.auth.logout_user(raw.as_deref()).await?;

    Ok((
        clear_session_cookies(jar, state.cookies),
        Json(ApiEnvelope::new("Successfully logged out", ())),
    ))
}
