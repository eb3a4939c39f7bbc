/**
 * Authentication Wire Types
 *
 * Request bodies, response envelopes and input validation for the `/api/auth`
 * endpoints. Both the axum handlers and the reqwest client serialize through
 * these types, so the two halves cannot drift apart.
 *
 * # Envelopes
 *
 * Successful responses are wrapped as `{"message": "...", "data": ...}`.
 * Failures carry `{"success": false, "error": "<Kind>", "message": "..."}`.
 */

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Cookie carrying the short-lived access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Cookie carrying the long-lived opaque refresh secret.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Path of the refresh endpoint, relative to the API base.
pub const REFRESH_PATH: &str = "/auth/refresh";

const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 30;
const PASSWORD_MIN_LEN: usize = 6;

/// Registration request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RegisterRequest {
    /// Chosen username (3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// Email address, normalized before storage
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password change request for the authenticated user
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Success envelope used by every auth endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiEnvelope<T> {
    /// Human-readable outcome
    pub message: String,
    /// Endpoint payload (`null` for logout)
    pub data: T,
}

impl<T> ApiEnvelope<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Failure body produced by the backend error handler.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub success: bool,
    /// Error kind, e.g. `InvalidTokenError`
    pub error: String,
    pub message: String,
}

/// Payload of the revoke-all endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevokedSessions {
    pub revoked: u64,
}

/// Validate a username: 3-30 characters of `[A-Za-z0-9_]`.
pub fn validate_username(username: &str) -> Result<(), SharedError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(SharedError::validation(
            "username",
            format!("must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters"),
        ));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SharedError::validation(
            "username",
            "may only contain letters, digits and underscores",
        ));
    }
    Ok(())
}

/// Trim and lowercase an email, rejecting anything without exactly one `@`
/// separating two non-empty parts.
pub fn normalize_email(email: &str) -> Result<String, SharedError> {
    let normalized = email.trim().to_ascii_lowercase();
    match normalized.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(normalized)
        }
        _ => Err(SharedError::validation("email", "must be a valid email address")),
    }
}

/// Validate a new password.
pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(SharedError::validation(
            "password",
            format!("must be at least {PASSWORD_MIN_LEN} characters"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_accepts_three_chars() {
        assert!(validate_username("ana").is_ok());
        assert!(validate_username("snake_case_99").is_ok());
    }

    #[test]
    fn test_validate_username_rejects_bad_length_and_chars() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"x".repeat(31)).is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("dash-ed").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@X.com ").unwrap(), "ana@x.com");
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@x.com").is_err());
        assert!(normalize_email("ana@").is_err());
        assert!(normalize_email("a@b@c").is_err());
    }

    #[test]
    fn test_validate_password_min_length() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_envelope_round_trips_null_data() {
        let body = serde_json::to_string(&ApiEnvelope::new("Successfully logged out", ())).unwrap();
        assert_eq!(body, r#"{"message":"Successfully logged out","data":null}"#);
    }
}
