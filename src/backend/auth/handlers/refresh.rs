/**
 * Refresh Handler
 *
 * POST /api/auth/refresh
 *
 * Reads the `refreshToken` cookie and rotates it. On success both cookies
 * are replaced; on any failure both are cleared so the client stops
 * presenting a dead secret.
 */

use axum::extract::State;
use axum_extra::extract::CookieJar;

use crate::backend::auth::cookies::{clear_session_cookies, refresh_token_from, set_session_cookies};
use crate::backend::auth::handlers::types::{user_response, UserResponse};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, UserResponse), (CookieJar, BackendError)> {
    let Some(raw) = refresh_token_from(&jar) else {
        tracing::debug!("refresh without cookie");
        return Err((clear_session_cookies(jar, state.cookies), BackendError::InvalidToken));
    };

    match state.auth.refresh_tokens(&raw).await {
        Ok(session) => {
            let jar = set_session_cookies(jar, &session, state.cookies);
            Ok((jar, user_response("Tokens refreshed", session.user)))
        }
        Err(e) => Err((clear_session_cookies(jar, state.cookies), e)),
    }
}
