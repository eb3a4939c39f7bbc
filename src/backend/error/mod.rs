//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are returned from handlers and middleware and converted to
//! HTTP responses by one `IntoResponse` implementation.
//!
//! # Architecture
//!
//! - **`types`** - `BackendError`, status and taxonomy mapping
//! - **`conversion`** - `IntoResponse` (the catch-all error handler)
//!
//! # Example
//!
//! ```rust,no_run
//! use murmur::backend::error::BackendError;
//!
//! async fn handler() -> Result<&'static str, BackendError> {
//!     Err(BackendError::InvalidToken)
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
