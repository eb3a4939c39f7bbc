//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - access-token gate for protected routes, plus the
//!   `AuthUser` extractor handlers use to read the identity it attaches
//!
//! # Example
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use murmur::backend::middleware::require_auth;
//! use murmur::backend::server::AppState;
//!
//! fn protect(router: Router<AppState>, state: AppState) -> Router<AppState> {
//!     router.route_layer(middleware::from_fn_with_state(state, require_auth))
//! }
//! ```

pub mod auth;

pub use auth::{require_auth, token_from_request, AuthUser, AuthenticatedUser};
