//! Password hashing.
//!
//! bcrypt is CPU-bound, so both operations run on the blocking pool instead
//! of stalling a runtime worker.

use crate::backend::error::BackendError;

/// Hash a plaintext password at the given bcrypt cost.
pub async fn hash_password(password: String, cost: u32) -> Result<String, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| BackendError::internal(format!("password hashing task failed: {e}")))?
        .map_err(|e| BackendError::internal(format!("failed to hash password: {e}")))
}

/// Check a plaintext password against a stored bcrypt hash.
pub async fn verify_password(password: String, hash: String) -> Result<bool, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| BackendError::internal(format!("password verification task failed: {e}")))?
        .map_err(|e| BackendError::internal(format!("failed to verify password: {e}")))
}
