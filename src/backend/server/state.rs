/**
 * Application State Management
 *
 * This module defines the application state shared by every handler and
 * the authentication middleware.
 *
 * # Thread Safety
 *
 * `AppState` is cheap to clone: the service holds its store behind an
 * `Arc`, and the cookie settings are `Copy`.
 *
 * # Example
 *
 * ```rust,no_run
 * use axum::extract::State;
 * use murmur::backend::server::state::AppState;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let _ttl = state.auth.access_ttl_secs();
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::sessions::AccessTokenIssuer;
use crate::backend::auth::store::AuthStore;
use crate::backend::auth::{AuthService, CookieSettings};
use crate::backend::server::config::ServerConfig;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Token issuance service
    pub auth: AuthService,

    /// Attributes applied to every session cookie
    pub cookies: CookieSettings,
}

impl AppState {
    /// Build the state from configuration and an opened store.
    pub fn new(config: &ServerConfig, store: Arc<dyn AuthStore>) -> Self {
        let issuer = AccessTokenIssuer::new(config.jwt_secret.as_bytes(), config.access_ttl_secs);
        Self {
            auth: AuthService::new(store, issuer, config.session_policy()),
            cookies: config.cookie_settings(),
        }
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
