//! Credential and refresh-token persistence.
//!
//! `AuthStore` is the only seam between the token service and storage.
//! Two implementations ship:
//!
//! - **`PgStore`** - PostgreSQL via sqlx; rotation runs in one transaction
//! - **`MemoryStore`** - process-local tables behind a tokio `RwLock`, used
//!   when `DATABASE_URL` is unset and throughout the test suites

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::backend::auth::refresh::{NewRefreshToken, RefreshTokenRecord};
use crate::backend::auth::users::{NewUser, UserRecord};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique column already holds this value (`"email"`, `"username"`, ...)
    #[error("duplicate {0}")]
    Duplicate(&'static str),
    #[error("record not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Insert a user. Fails with `Duplicate` on a taken email or username.
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError>;

    /// Replace a user's password hash. `NotFound` if the user is gone.
    async fn update_password_hash(&self, user_id: i64, password_hash: &str) -> Result<(), StoreError>;

    async fn insert_refresh_token(&self, token: NewRefreshToken) -> Result<RefreshTokenRecord, StoreError>;

    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, StoreError>;

    /// Delete one record by id. Returns whether a row was removed.
    async fn delete_refresh_token(&self, id: i64) -> Result<bool, StoreError>;

    /// Delete one record by hash. Returns whether a row was removed.
    async fn delete_refresh_token_by_hash(&self, token_hash: &str) -> Result<bool, StoreError>;

    /// Atomically consume `consumed_id` and insert its replacement.
    ///
    /// Returns `None`, and inserts nothing, when the consumed record no
    /// longer exists (another request already rotated it).
    async fn rotate_refresh_token(
        &self,
        consumed_id: i64,
        replacement: NewRefreshToken,
    ) -> Result<Option<RefreshTokenRecord>, StoreError>;

    /// Delete every refresh token of a user; returns the number removed.
    async fn delete_refresh_tokens_for_user(&self, user_id: i64) -> Result<u64, StoreError>;

    /// Delete every refresh token with `expires_at <= now`.
    async fn purge_expired_refresh_tokens(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}
