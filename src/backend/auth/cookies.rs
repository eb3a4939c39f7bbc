use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::backend::auth::service::AuthSession;
use crate::shared::auth::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};

/// Cookie attributes shared by every session cookie the server sets.
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub secure: bool,
    pub access_max_age_secs: i64,
    pub refresh_max_age_secs: i64,
}

fn session_cookie(name: &'static str, value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Add both session cookies for a freshly minted session.
pub fn set_session_cookies(jar: CookieJar, session: &AuthSession, settings: CookieSettings) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        session.access_token.clone(),
        settings.access_max_age_secs,
        settings.secure,
    ))
    .add(session_cookie(
        REFRESH_TOKEN_COOKIE,
        session.refresh_token.clone(),
        settings.refresh_max_age_secs,
        settings.secure,
    ))
}

/// Expire both session cookies, with the attributes they were set with.
pub fn clear_session_cookies(jar: CookieJar, settings: CookieSettings) -> CookieJar {
    jar.add(removal_cookie(ACCESS_TOKEN_COOKIE, settings.secure))
        .add(removal_cookie(REFRESH_TOKEN_COOKIE, settings.secure))
}

/// Raw refresh secret sent by the client, if any.
pub fn refresh_token_from(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
