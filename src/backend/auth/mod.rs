//! Authentication Module
//!
//! This module issues, rotates and revokes sessions. It provides the token
//! issuance service, its persistence seam, and the HTTP handlers that expose
//! it under `/api/auth`.
//!
//! # Architecture
//!
//! - **`users`** - credential record and its public projection
//! - **`sessions`** - HS256 access tokens (sign / verify)
//! - **`refresh`** - opaque refresh secrets and their stored digests
//! - **`passwords`** - bcrypt on the blocking pool
//! - **`store`** - `AuthStore` trait, PostgreSQL and in-memory stores
//! - **`service`** - `AuthService`, the token issuance service
//! - **`cookies`** - session cookie construction
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Session Model
//!
//! - Access tokens are short-lived (15 minutes by default) and verified
//!   statelessly
//! - Refresh tokens are opaque, single-use, stored only as SHA-256 digests
//!   and valid for 7 days by default
//! - Each login creates an independent refresh token, so several devices can
//!   hold sessions at once
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use murmur::backend::auth::{AccessTokenIssuer, AuthService, MemoryStore, SessionPolicy};
//!
//! # async fn example() -> Result<(), murmur::backend::error::BackendError> {
//! let service = AuthService::new(
//!     Arc::new(MemoryStore::new()),
//!     AccessTokenIssuer::new(b"secret", 900),
//!     SessionPolicy::default(),
//! );
//! let session = service.register_user("ana", "ana@x.com", "secret1").await?;
//! let rotated = service.refresh_tokens(&session.refresh_token).await?;
//! # let _ = rotated;
//! # Ok(())
//! # }
//! ```

/// Credential records
pub mod users;

/// Access token signing and verification
pub mod sessions;

/// Refresh secrets
pub mod refresh;

/// Password hashing
pub mod passwords;

/// Persistence
pub mod store;

/// Token issuance service
pub mod service;

/// Session cookies
pub mod cookies;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use cookies::CookieSettings;
pub use service::{AuthService, AuthSession, SessionPolicy};
pub use sessions::{AccessTokenIssuer, Claims, TokenError};
pub use store::{AuthStore, MemoryStore, PgStore, StoreError};
