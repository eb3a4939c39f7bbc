//! Refresh token secrets and records.
//!
//! A refresh secret is 64 random bytes rendered as hex. Only its SHA-256
//! digest is persisted; the raw value is handed to the client once.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Random bytes per refresh secret.
pub const REFRESH_SECRET_BYTES: usize = 64;

/// Persisted refresh token
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RefreshTokenRecord {
    pub id: i64,
    pub user_id: i64,
    /// SHA-256 hex digest of the raw secret
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Refresh token about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRefreshToken {
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Generate a fresh raw refresh secret from the thread CSPRNG.
pub fn generate_refresh_secret() -> String {
    let mut bytes = [0u8; REFRESH_SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    bytes_to_hex(&bytes)
}

/// Digest stored in place of the raw secret.
pub fn hash_refresh_secret(raw: &str) -> String {
    bytes_to_hex(&Sha256::digest(raw.as_bytes()))
}

fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        })
}
