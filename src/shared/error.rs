//! Input errors raised by the shared validators and by request-body decoding.

use thiserror::Error;

/// Why a request body was refused. Both variants map to HTTP 400.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Body missing, not JSON, or not the expected shape
    #[error("Malformed request body: {message}")]
    MalformedBody { message: String },

    #[error("Invalid {field}: {message}")]
    ValidationError { field: String, message: String },
}

impl SharedError {
    pub fn malformed_body(message: impl Into<String>) -> Self {
        Self::MalformedBody {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending field, if the error is about one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationError { field, .. } => Some(field),
            Self::MalformedBody { .. } => None,
        }
    }
}
