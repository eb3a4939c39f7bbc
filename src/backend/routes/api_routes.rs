/**
 * API Route Handlers
 *
 * This module mounts the authentication endpoints.
 *
 * # Routes
 *
 * ## Public
 * - `POST /auth/register` - User registration
 * - `POST /auth/login` - User login
 * - `POST /auth/logout` - Drop the refresh token, clear cookies
 * - `POST /auth/refresh` - Rotate the refresh token
 *
 * ## Authenticated (access token required)
 * - `GET /auth/me` - Current user
 * - `POST /auth/password` - Change password
 * - `POST /auth/sessions/revoke` - Log out everywhere
 *
 * Paths are relative; `create_router` nests them under `/api`.
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::auth::handlers::{
    change_password, get_me, login, logout, refresh, register, revoke_all,
};
use crate::backend::middleware::require_auth;
use crate::backend::server::state::AppState;

/// Configure authentication routes
pub fn configure_auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(get_me))
        .route("/auth/password", post(change_password))
        .route("/auth/sessions/revoke", post(revoke_all))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
        .merge(protected)
}
