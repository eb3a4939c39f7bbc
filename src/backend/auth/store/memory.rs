//! In-memory `AuthStore`.
//!
//! Every operation takes the single table lock once, so rotation is as
//! atomic here as the transaction in `PgStore`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{AuthStore, StoreError};
use crate::backend::auth::refresh::{NewRefreshToken, RefreshTokenRecord};
use crate::backend::auth::users::{NewUser, UserRecord};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<i64, UserRecord>,
    refresh_tokens: HashMap<i64, RefreshTokenRecord>,
    next_user_id: i64,
    next_token_id: i64,
}

impl Tables {
    fn insert_token(&mut self, token: NewRefreshToken) -> Result<RefreshTokenRecord, StoreError> {
        if self
            .refresh_tokens
            .values()
            .any(|t| t.token_hash == token.token_hash)
        {
            return Err(StoreError::Duplicate("token_hash"));
        }
        if !self.users.contains_key(&token.user_id) {
            return Err(StoreError::NotFound);
        }

        self.next_token_id += 1;
        let record = RefreshTokenRecord {
            id: self.next_token_id,
            user_id: token.user_id,
            token_hash: token.token_hash,
            expires_at: token.expires_at,
            created_at: Utc::now(),
        };
        self.refresh_tokens.insert(record.id, record.clone());
        Ok(record)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live refresh-token records.
    pub async fn refresh_token_count(&self) -> usize {
        self.tables.read().await.refresh_tokens.len()
    }

    /// Number of refresh-token records belonging to one user.
    pub async fn refresh_token_count_for(&self, user_id: i64) -> usize {
        self.tables
            .read()
            .await
            .refresh_tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .count()
    }

    /// Overwrite the expiry of every token of a user.
    pub async fn set_refresh_expiry_for(&self, user_id: i64, expires_at: DateTime<Utc>) {
        let mut tables = self.tables.write().await;
        for token in tables.refresh_tokens.values_mut().filter(|t| t.user_id == user_id) {
            token.expires_at = expires_at;
        }
    }

    /// Set a user's stored avatar path.
    pub async fn set_avatar(&self, user_id: i64, avatar_url: Option<String>) {
        if let Some(user) = self.tables.write().await.users.get_mut(&user_id) {
            user.avatar_url = avatar_url;
        }
    }

    /// Remove a user and, like the foreign-key cascade, their tokens.
    pub async fn delete_user(&self, user_id: i64) {
        let mut tables = self.tables.write().await;
        tables.users.remove(&user_id);
        tables.refresh_tokens.retain(|_, t| t.user_id != user_id);
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::Duplicate("email"));
        }
        if tables.users.values().any(|u| u.username == new_user.username) {
            return Err(StoreError::Duplicate("username"));
        }

        tables.next_user_id += 1;
        let now = Utc::now();
        let user = UserRecord {
            id: tables.next_user_id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            avatar_url: None,
            bio: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn update_password_hash(&self, user_id: i64, password_hash: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_refresh_token(&self, token: NewRefreshToken) -> Result<RefreshTokenRecord, StoreError> {
        self.tables.write().await.insert_token(token)
    }

    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .refresh_tokens
            .values()
            .find(|t| t.token_hash == token_hash)
            .cloned())
    }

    async fn delete_refresh_token(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.refresh_tokens.remove(&id).is_some())
    }

    async fn delete_refresh_token_by_hash(&self, token_hash: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.refresh_tokens.len();
        tables.refresh_tokens.retain(|_, t| t.token_hash != token_hash);
        Ok(tables.refresh_tokens.len() < before)
    }

    async fn rotate_refresh_token(
        &self,
        consumed_id: i64,
        replacement: NewRefreshToken,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        let mut tables = self.tables.write().await;
        let consumed = match tables.refresh_tokens.remove(&consumed_id) {
            Some(consumed) => consumed,
            None => return Ok(None),
        };

        match tables.insert_token(replacement) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                // roll back
                tables.refresh_tokens.insert(consumed.id, consumed);
                Err(e)
            }
        }
    }

    async fn delete_refresh_tokens_for_user(&self, user_id: i64) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.refresh_tokens.len();
        tables.refresh_tokens.retain(|_, t| t.user_id != user_id);
        Ok((before - tables.refresh_tokens.len()) as u64)
    }

    async fn purge_expired_refresh_tokens(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.refresh_tokens.len();
        tables.refresh_tokens.retain(|_, t| !t.is_expired(now));
        Ok((before - tables.refresh_tokens.len()) as u64)
    }
}
