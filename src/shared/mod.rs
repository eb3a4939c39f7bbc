//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the client and backend. These types describe the JSON bodies exchanged
//! over the `/api/auth` endpoints.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! in both server and client code. All types are designed for serialization
//! and transmission over HTTP.

/// Public user projection
pub mod user;

/// Auth request/response bodies, cookie names and input validation
pub mod auth;

/// Shared error types
pub mod error;

/// Environment parsing helpers and configuration errors
pub mod config;

/// Re-export commonly used types for convenience
pub use user::User;
pub use auth::{ApiEnvelope, ChangePasswordRequest, ErrorBody, LoginRequest, RegisterRequest};
pub use error::SharedError;
pub use config::ConfigError;
