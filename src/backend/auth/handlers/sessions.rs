//! POST /api/auth/sessions/revoke
//!
//! Logs the caller out on every device by deleting all of their refresh
//! tokens, and clears the caller's own cookies.

use axum::{extract::State, response::Json};
use axum_extra::extract::CookieJar;

use crate::backend::auth::cookies::clear_session_cookies;
use crate::backend::auth::handlers::types::RevokedResponse;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::auth::{ApiEnvelope, RevokedSessions};

pub async fn revoke_all(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
) -> Result<(CookieJar, RevokedResponse), BackendError> {
    let revoked = state.auth.revoke_all_sessions(user.user_id).await?;

    Ok((
        clear_session_cookies(jar, state.cookies),
        Json(ApiEnvelope::new("All sessions revoked", RevokedSessions { revoked })),
    ))
}
