/**
 * Backend Error Types
 *
 * This module defines the error taxonomy of the authentication backend.
 * Every handler returns `Result<_, BackendError>`; the `IntoResponse`
 * implementation in `conversion` turns each variant into a status code and
 * a `{success, error, message}` body.
 *
 * # Error Categories
 *
 * ## Client errors (4xx)
 *
 * - `Conflict` - duplicate email or username at registration
 * - `InvalidCredentials` - unknown email or wrong password (indistinguishable)
 * - `InvalidToken` / `ExpiredToken` - refresh failures
 * - `Unauthenticated` - missing, badly signed or expired access token
 * - `NotFound` - the identity vanished between issuance and use
 * - `Validation` - malformed JSON body, or input rejected by the validators
 *
 * ## Server errors (5xx)
 *
 * - `Store` - persistence failure
 * - `Internal` - hashing, signing or task failures
 */

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::sessions::TokenError;
use crate::backend::auth::store::StoreError;
use crate::shared::SharedError;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Conflict(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidToken,

    #[error("Refresh token expired")]
    ExpiredToken,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    NotFound(String),

    /// Input validation error (from the shared validators)
    #[error(transparent)]
    Validation(#[from] SharedError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BackendError {
    /// Create a new conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create a new not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InvalidCredentials
            | Self::InvalidToken
            | Self::ExpiredToken
            | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Taxonomy name reported in the `error` field of the response body
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "ConflictError",
            Self::InvalidCredentials => "InvalidCredentialsError",
            Self::InvalidToken => "InvalidTokenError",
            Self::ExpiredToken => "ExpiredTokenError",
            Self::Unauthenticated => "Unauthenticated",
            Self::NotFound(_) => "NotFoundError",
            Self::Validation(_) => "ValidationError",
            Self::Store(_) | Self::Internal(_) => "InternalError",
        }
    }

    /// Message safe to show to the caller.
    ///
    /// Server errors collapse to a generic message; the detail is only logged.
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(SharedError::malformed_body(rejection.body_text()))
    }
}

impl From<TokenError> for BackendError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::Invalid => Self::Unauthenticated,
            TokenError::Signing(message) => Self::Internal(message),
        }
    }
}
