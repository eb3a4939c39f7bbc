/**
 * Token Issuance Service
 *
 * Owns the lifecycle of credentials and tokens: registration, login,
 * refresh rotation, logout, password change and session revocation.
 *
 * # Refresh rotation
 *
 * A refresh secret is single-use. Presenting it deletes its record and
 * inserts the replacement in one atomic store operation. A second
 * presentation of the same secret finds no matching hash and fails with
 * `InvalidToken`, which is what makes a stolen and already-rotated secret
 * worthless.
 *
 * # Expiry
 *
 * An expired record is deleted when presented, so the first presentation
 * reports `ExpiredToken` and every later one reports `InvalidToken`.
 */

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::backend::auth::passwords::{hash_password, verify_password};
use crate::backend::auth::refresh::{generate_refresh_secret, hash_refresh_secret, NewRefreshToken};
use crate::backend::auth::sessions::{AccessTokenIssuer, Claims};
use crate::backend::auth::store::{AuthStore, StoreError};
use crate::backend::auth::users::{resolve_avatar_url, NewUser, UserRecord};
use crate::backend::error::BackendError;
use crate::shared::auth::{normalize_email, validate_password, validate_username};
use crate::shared::User;

/// Knobs the service applies to every session it mints.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Avatar reported by `get_me` when the user has none
    pub default_avatar_url: Option<String>,
    /// Base used to absolutize server-relative avatar paths
    pub public_base_url: Option<String>,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            refresh_ttl: Duration::days(7),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            default_avatar_url: None,
            public_base_url: None,
        }
    }
}

/// A freshly minted session: the user plus both raw tokens.
#[derive(Clone)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn AuthStore>,
    tokens: AccessTokenIssuer,
    policy: Arc<SessionPolicy>,
}

impl AuthService {
    pub fn new(store: Arc<dyn AuthStore>, tokens: AccessTokenIssuer, policy: SessionPolicy) -> Self {
        Self {
            store,
            tokens,
            policy: Arc::new(policy),
        }
    }

    pub fn store(&self) -> &Arc<dyn AuthStore> {
        &self.store
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.tokens.ttl_secs()
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        self.policy.refresh_ttl.num_seconds()
    }

    /// Verify an access token without touching the store.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, BackendError> {
        Ok(self.tokens.verify(token)?)
    }

    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        let username = username.trim();
        validate_username(username)?;
        let email = normalize_email(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password.to_string(), self.policy.bcrypt_cost).await?;

        let user = self
            .store
            .create_user(NewUser {
                username: username.to_string(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(field) => {
                    tracing::warn!(field, "registration conflict");
                    BackendError::conflict(format!("User with this {field} already exists"))
                }
                other => BackendError::Store(other),
            })?;

        tracing::info!(user_id = user.id, "user registered");
        self.issue_session(&user).await
    }

    /// Unknown email and wrong password fail identically.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let email = normalize_email(email).map_err(|_| BackendError::InvalidCredentials)?;

        let user = match self.store.find_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("login for unknown email");
                return Err(BackendError::InvalidCredentials);
            }
        };

        if !verify_password(password.to_string(), user.password_hash.clone()).await? {
            tracing::debug!(user_id = user.id, "login with wrong password");
            return Err(BackendError::InvalidCredentials);
        }

        tracing::info!(user_id = user.id, "user logged in");
        self.issue_session(&user).await
    }

    /// Exchange a raw refresh secret for a new session, consuming it.
    pub async fn refresh_tokens(&self, raw: &str) -> Result<AuthSession, BackendError> {
        if raw.is_empty() {
            return Err(BackendError::InvalidToken);
        }

        let record = self
            .store
            .find_refresh_token(&hash_refresh_secret(raw))
            .await?
            .ok_or(BackendError::InvalidToken)?;

        let now = Utc::now();
        if record.is_expired(now) {
            self.store.delete_refresh_token(record.id).await?;
            tracing::debug!(user_id = record.user_id, "expired refresh token presented");
            return Err(BackendError::ExpiredToken);
        }

        let user = self
            .store
            .find_user_by_id(record.user_id)
            .await?
            .ok_or(BackendError::InvalidToken)?;

        let secret = generate_refresh_secret();
        let replacement = NewRefreshToken {
            user_id: user.id,
            token_hash: hash_refresh_secret(&secret),
            expires_at: now + self.policy.refresh_ttl,
        };

        if self
            .store
            .rotate_refresh_token(record.id, replacement)
            .await?
            .is_none()
        {
            tracing::warn!(user_id = user.id, "refresh token consumed concurrently");
            return Err(BackendError::InvalidToken);
        }

        let access_token = self.tokens.issue(user.id, &user.email)?;
        tracing::debug!(user_id = user.id, "refresh token rotated");

        Ok(AuthSession {
            user: user.to_public(),
            access_token,
            refresh_token: secret,
        })
    }

    /// Delete the record matching `raw`, if any. Absence is not an error.
    pub async fn logout_user(&self, raw: Option<&str>) -> Result<(), BackendError> {
        if let Some(raw) = raw.filter(|r| !r.is_empty()) {
            let removed = self
                .store
                .delete_refresh_token_by_hash(&hash_refresh_secret(raw))
                .await?;
            tracing::debug!(removed, "logout");
        }
        Ok(())
    }

    /// Current user, with the avatar resolved for display.
    pub async fn get_me(&self, user_id: i64) -> Result<User, BackendError> {
        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| BackendError::not_found("User not found"))?;

        let mut public = user.to_public();
        public.avatar_url = resolve_avatar_url(
            public.avatar_url.as_deref(),
            self.policy.default_avatar_url.as_deref(),
            self.policy.public_base_url.as_deref(),
        );
        Ok(public)
    }

    /// Log a user out everywhere. Returns the number of sessions revoked.
    pub async fn revoke_all_sessions(&self, user_id: i64) -> Result<u64, BackendError> {
        let revoked = self.store.delete_refresh_tokens_for_user(user_id).await?;
        tracing::info!(user_id, revoked, "revoked all refresh tokens");
        Ok(revoked)
    }

    /// Change the password, revoke every refresh token, then mint a new
    /// session for the caller.
    pub async fn change_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<AuthSession, BackendError> {
        validate_password(new_password)?;

        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| BackendError::not_found("User not found"))?;

        if !verify_password(current_password.to_string(), user.password_hash.clone()).await? {
            return Err(BackendError::InvalidCredentials);
        }

        let password_hash = hash_password(new_password.to_string(), self.policy.bcrypt_cost).await?;
        self.store
            .update_password_hash(user.id, &password_hash)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => BackendError::not_found("User not found"),
                other => BackendError::Store(other),
            })?;

        let revoked = self.store.delete_refresh_tokens_for_user(user.id).await?;
        tracing::info!(user_id = user.id, revoked, "password changed");

        self.issue_session(&user).await
    }

    /// Delete every expired refresh token. Returns the number removed.
    pub async fn purge_expired_tokens(&self) -> Result<u64, BackendError> {
        Ok(self.store.purge_expired_refresh_tokens(Utc::now()).await?)
    }

    async fn issue_session(&self, user: &UserRecord) -> Result<AuthSession, BackendError> {
        let access_token = self.tokens.issue(user.id, &user.email)?;

        let secret = generate_refresh_secret();
        self.store
            .insert_refresh_token(NewRefreshToken {
                user_id: user.id,
                token_hash: hash_refresh_secret(&secret),
                expires_at: Utc::now() + self.policy.refresh_ttl,
            })
            .await?;

        Ok(AuthSession {
            user: user.to_public(),
            access_token,
            refresh_token: secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::store::MemoryStore;
    use assert_matches::assert_matches;

    fn service_with(store: Arc<MemoryStore>) -> AuthService {
        AuthService::new(
            store,
            AccessTokenIssuer::new(b"service-test-secret", 900),
            SessionPolicy {
                bcrypt_cost: 4,
                default_avatar_url: Some("https://cdn.x/default.png".to_string()),
                public_base_url: Some("https://api.x".to_string()),
                ..SessionPolicy::default()
            },
        )
    }

    fn service() -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (service_with(store.clone()), store)
    }

    #[tokio::test]
    async fn test_register_then_login_same_user() {
        let (svc, _) = service();
        let registered = svc.register_user("ana", "Ana@X.com", "secret1").await.unwrap();
        assert_eq!(registered.user.email, "ana@x.com");
        assert_eq!(registered.refresh_token.len(), 128);

        let logged_in = svc.login_user("ana@x.com", "secret1").await.unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);
        assert_ne!(logged_in.refresh_token, registered.refresh_token);
    }

    #[tokio::test]
    async fn test_register_conflict_and_validation() {
        let (svc, _) = service();
        svc.register_user("ana", "ana@x.com", "secret1").await.unwrap();

        assert_matches!(
            svc.register_user("ana2", "ana@x.com", "secret1").await,
            Err(BackendError::Conflict(msg)) if msg.contains("email")
        );
        assert_matches!(
            svc.register_user("ana", "other@x.com", "secret1").await,
            Err(BackendError::Conflict(msg)) if msg.contains("username")
        );
        assert_matches!(
            svc.register_user("ab", "ab@x.com", "secret1").await,
            Err(BackendError::Validation(_))
        );
        assert_matches!(
            svc.register_user("abc", "abc@x.com", "123").await,
            Err(BackendError::Validation(_))
        );
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (svc, _) = service();
        svc.register_user("ana", "ana@x.com", "secret1").await.unwrap();

        let unknown = svc.login_user("nobody@x.com", "secret1").await.unwrap_err();
        let wrong = svc.login_user("ana@x.com", "wrong-pw").await.unwrap_err();
        assert_matches!(unknown, BackendError::InvalidCredentials);
        assert_matches!(wrong, BackendError::InvalidCredentials);
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_refresh_is_single_use() {
        let (svc, store) = service();
        let session = svc.register_user("ana", "ana@x.com", "secret1").await.unwrap();

        let rotated = svc.refresh_tokens(&session.refresh_token).await.unwrap();
        assert_ne!(rotated.refresh_token, session.refresh_token);
        assert_eq!(rotated.user.id, session.user.id);

        assert_matches!(
            svc.refresh_tokens(&session.refresh_token).await,
            Err(BackendError::InvalidToken)
        );
        assert_eq!(store.refresh_token_count_for(session.user.id).await, 1);
    }

    #[tokio::test]
    async fn test_expired_refresh_then_invalid() {
        let (svc, store) = service();
        let session = svc.register_user("ana", "ana@x.com", "secret1").await.unwrap();
        store
            .set_refresh_expiry_for(session.user.id, Utc::now() - Duration::seconds(1))
            .await;

        assert_matches!(
            svc.refresh_tokens(&session.refresh_token).await,
            Err(BackendError::ExpiredToken)
        );
        assert_matches!(
            svc.refresh_tokens(&session.refresh_token).await,
            Err(BackendError::InvalidToken)
        );
        assert_eq!(store.refresh_token_count().await, 0);
    }

    #[tokio::test]
    async fn test_refresh_garbage_and_empty() {
        let (svc, _) = service();
        assert_matches!(svc.refresh_tokens("garbage").await, Err(BackendError::InvalidToken));
        assert_matches!(svc.refresh_tokens("").await, Err(BackendError::InvalidToken));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let (svc, store) = service();
        let session = svc.register_user("ana", "ana@x.com", "secret1").await.unwrap();

        svc.logout_user(Some(&session.refresh_token)).await.unwrap();
        svc.logout_user(Some(&session.refresh_token)).await.unwrap();
        svc.logout_user(None).await.unwrap();
        svc.logout_user(Some("unknown")).await.unwrap();
        assert_eq!(store.refresh_token_count().await, 0);
    }

    #[tokio::test]
    async fn test_get_me_resolves_avatar_and_reports_missing_user() {
        let (svc, store) = service();
        let session = svc.register_user("ana", "ana@x.com", "secret1").await.unwrap();

        let me = svc.get_me(session.user.id).await.unwrap();
        assert_eq!(me.avatar_url.as_deref(), Some("https://cdn.x/default.png"));

        store
            .set_avatar(session.user.id, Some("/uploads/ana.png".to_string()))
            .await;
        let me = svc.get_me(session.user.id).await.unwrap();
        assert_eq!(me.avatar_url.as_deref(), Some("https://api.x/uploads/ana.png"));

        store.delete_user(session.user.id).await;
        assert_matches!(svc.get_me(session.user.id).await, Err(BackendError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_change_password_revokes_other_sessions() {
        let (svc, _) = service();
        let first = svc.register_user("ana", "ana@x.com", "secret1").await.unwrap();
        let second = svc.login_user("ana@x.com", "secret1").await.unwrap();

        assert_matches!(
            svc.change_password(first.user.id, "wrong-pw", "secret2").await,
            Err(BackendError::InvalidCredentials)
        );

        let fresh = svc.change_password(first.user.id, "secret1", "secret2").await.unwrap();

        assert_matches!(
            svc.refresh_tokens(&first.refresh_token).await,
            Err(BackendError::InvalidToken)
        );
        assert_matches!(
            svc.refresh_tokens(&second.refresh_token).await,
            Err(BackendError::InvalidToken)
        );
        assert!(svc.refresh_tokens(&fresh.refresh_token).await.is_ok());

        assert_matches!(
            svc.login_user("ana@x.com", "secret1").await,
            Err(BackendError::InvalidCredentials)
        );
        assert!(svc.login_user("ana@x.com", "secret2").await.is_ok());
    }

    #[tokio::test]
    async fn test_revoke_all_and_purge() {
        let (svc, store) = service();
        let session = svc.register_user("ana", "ana@x.com", "secret1").await.unwrap();
        svc.login_user("ana@x.com", "secret1").await.unwrap();

        assert_eq!(svc.revoke_all_sessions(session.user.id).await.unwrap(), 2);
        assert_matches!(
            svc.refresh_tokens(&session.refresh_token).await,
            Err(BackendError::InvalidToken)
        );

        svc.login_user("ana@x.com", "secret1").await.unwrap();
        store
            .set_refresh_expiry_for(session.user.id, Utc::now() - Duration::seconds(1))
            .await;
        assert_eq!(svc.purge_expired_tokens().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_access_token_carries_identity() {
        let (svc, _) = service();
        let session = svc.register_user("ana", "ana@x.com", "secret1").await.unwrap();
        let claims = svc.verify_access_token(&session.access_token).unwrap();
        assert_eq!(claims.user_id().unwrap(), session.user.id);
        assert_eq!(claims.email, "ana@x.com");
    }

    #[test]
    fn test_session_debug_redacts_tokens() {
        let session = AuthSession {
            user: User {
                id: 1,
                username: "ana".into(),
                email: "ana@x.com".into(),
                avatar_url: None,
                bio: None,
            },
            access_token: "AAA-secret".into(),
            refresh_token: "RRR-secret".into(),
        };
        let debug = format!("{session:?}");
        assert!(!debug.contains("AAA-secret"));
        assert!(!debug.contains("RRR-secret"));
    }
}
