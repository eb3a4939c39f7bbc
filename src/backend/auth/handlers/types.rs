/**
 * Authentication Handler Types
 *
 * Handlers speak the shared wire types; this module names the response
 * shapes they return so signatures stay readable.
 */

use axum::response::Json;
use axum_extra::extract::WithRejection;

use crate::backend::error::BackendError;

use crate::shared::auth::{ApiEnvelope, RevokedSessions};
use crate::shared::User;

pub use crate::shared::auth::{ChangePasswordRequest, LoginRequest, RegisterRequest};

/// `{message, data: user}`
pub type UserResponse = Json<ApiEnvelope<User>>;

/// `{message, data: null}`
pub type EmptyResponse = Json<ApiEnvelope<()>>;

/// `{message, data: {revoked}}`
pub type RevokedResponse = Json<ApiEnvelope<RevokedSessions>>;

/// Wrap a user in the success envelope.
pub fn user_response(message: &str, user: User) -> UserResponse {
    Json(ApiEnvelope::new(message, user))
}

/// JSON request body whose rejections go through `BackendError`, so a
/// malformed body still gets the `{success, error, message}` shape.
pub type JsonBody<T> = WithRejection<Json<T>, BackendError>;
