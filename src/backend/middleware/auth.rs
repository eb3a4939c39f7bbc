/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It reads the access token from the `accessToken`
 * cookie, falling back to an `Authorization: Bearer` header, verifies it,
 * and attaches the identity to the request for handlers.
 *
 * Verification is a pure function of the token: no database lookup.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::auth::ACCESS_TOKEN_COOKIE;

/// Authenticated user data extracted from the access token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
}

/// Pick the access token, preferring the cookie over the header.
pub fn token_from_request<'a>(jar: &'a CookieJar, headers: &'a HeaderMap) -> Option<&'a str> {
    if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware
///
/// Rejects with `Unauthenticated` (401) when the token is missing, badly
/// signed or expired. On success inserts `AuthenticatedUser` into the
/// request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = token_from_request(&jar, request.headers()).ok_or_else(|| {
        tracing::debug!(path = %request.uri().path(), "no access token");
        BackendError::Unauthenticated
    })?;

    let claims = state.auth.verify_access_token(token).map_err(|e| {
        tracing::debug!(error = %e, "access token rejected");
        BackendError::Unauthenticated
    })?;

    let user_id = claims.user_id().map_err(|_| BackendError::Unauthenticated)?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for authenticated user
///
/// Reads the identity attached by `require_auth`; rejects with 401 when the
/// route was mounted without the middleware.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::Unauthenticated
            })?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum_extra::extract::cookie::Cookie;

    #[test]
    fn test_cookie_preferred_over_header() {
        let jar = CookieJar::new().add(Cookie::new(ACCESS_TOKEN_COOKIE, "from-cookie"));
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));

        assert_eq!(token_from_request(&jar, &headers), Some("from-cookie"));
    }

    #[test]
    fn test_header_fallback() {
        let jar = CookieJar::new();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));

        assert_eq!(token_from_request(&jar, &headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_or_malformed() {
        let jar = CookieJar::new();
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_request(&jar, &headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(token_from_request(&jar, &headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(token_from_request(&jar, &headers), None);
    }

    #[test]
    fn test_empty_cookie_falls_back_to_header() {
        let jar = CookieJar::new().add(Cookie::new(ACCESS_TOKEN_COOKIE, ""));
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        assert_eq!(token_from_request(&jar, &headers), Some("tok"));
    }

    #[tokio::test]
    async fn test_extractor_requires_extension() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        assert!(matches!(
            AuthUser::from_request_parts(&mut parts, &()).await,
            Err(BackendError::Unauthenticated)
        ));

        parts.extensions.insert(AuthenticatedUser {
            user_id: 5,
            email: "a@x.com".to_string(),
        });
        let AuthUser(user) = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.user_id, 5);
    }
}
