//! Client error types.

use thiserror::Error;

use crate::shared::config::ConfigError;

/// Errors surfaced by the session client.
///
/// `Clone` so one refresh failure can be handed to every request that was
/// waiting on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Transport failure (connect, timeout, TLS)
    #[error("network error: {0}")]
    Http(String),

    /// 401 that was not (or could not be) recovered by a refresh
    #[error("unauthorized: {message}")]
    Unauthorized { code: String, message: String },

    /// Any other non-success response
    #[error("request failed with {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The shared refresh attempt failed; the session is gone
    #[error("session refresh failed: {0}")]
    RefreshFailed(Box<ClientError>),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// HTTP status carried by the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::RefreshFailed(inner) => inner.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Server taxonomy name, e.g. `InvalidCredentialsError`.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { code, .. } | Self::Api { code, .. } => Some(code),
            Self::RefreshFailed(inner) => inner.code(),
            _ => None,
        }
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { message, .. } | Self::Api { message, .. } => message.clone(),
            Self::RefreshFailed(_) => "Your session has expired. Please log in again.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_failed_exposes_inner_status_and_code() {
        let err = ClientError::RefreshFailed(Box::new(ClientError::Unauthorized {
            code: "InvalidTokenError".into(),
            message: "Invalid refresh token".into(),
        }));
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.code(), Some("InvalidTokenError"));
        assert!(!err.is_unauthorized());
        assert!(err.user_message().contains("log in again"));
    }

    #[test]
    fn test_api_error_message() {
        let err = ClientError::Api {
            status: 409,
            code: "ConflictError".into(),
            message: "User with this email already exists".into(),
        };
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.user_message(), "User with this email already exists");
    }
}
