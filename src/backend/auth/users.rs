/**
 * User Records
 *
 * This module defines the credential record as it is stored, and its
 * conversion into the public `User` projection.
 */

use chrono::{DateTime, Utc};

use crate::shared::User;

/// User as stored in the `users` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRecord {
    /// Unique user ID
    pub id: i64,
    /// Username (unique, 3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// Normalized email address (unique)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Public projection, dropping the hash and timestamps.
    pub fn to_public(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            avatar_url: self.avatar_url.clone(),
            bio: self.bio.clone(),
        }
    }
}

/// User about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Resolve the avatar shown for a user.
///
/// Missing avatars fall back to `default_avatar`. Absolute `http(s)` URLs are
/// kept as-is; server-relative paths (the default's included) are joined onto
/// `public_base_url` when one is configured.
pub fn resolve_avatar_url(
    avatar: Option<&str>,
    default_avatar: Option<&str>,
    public_base_url: Option<&str>,
) -> Option<String> {
    let avatar = avatar
        .filter(|a| !a.trim().is_empty())
        .or(default_avatar.filter(|a| !a.trim().is_empty()))?;

    if avatar.starts_with("http://") || avatar.starts_with("https://") {
        return Some(avatar.to_string());
    }

    match public_base_url {
        Some(base) => {
            let base = base.trim_end_matches('/');
            if avatar.starts_with('/') {
                Some(format!("{base}{avatar}"))
            } else {
                Some(format!("{base}/{avatar}"))
            }
        }
        None => Some(avatar.to_string()),
    }
}
