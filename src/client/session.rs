/**
 * Client Session Coordinator
 *
 * Owns the client's view of "who is logged in" and publishes it on a
 * `tokio::sync::watch` channel.
 *
 * # Phases
 *
 * `Uninitialized → Loading → Authenticated | Anonymous`
 *
 * # Transitions
 *
 * Every applied transition (entering bootstrap, a successful login or
 * register, logout, a failed session recovery) takes a new generation
 * number. The bootstrap result is applied only while its generation is
 * still the latest, so a slow bootstrap that finishes after the user logged
 * in cannot overwrite the login. Failed logins and registers only record an
 * error and take no generation.
 *
 * A bootstrap timeout moves a still-`Loading` session to `Anonymous`
 * without taking a generation, which lets the late bootstrap result still
 * land if nothing else happened meanwhile.
 */

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::watch;

use crate::client::api::AuthApi;
use crate::client::config::ClientConfig;
use crate::client::error::ClientError;
use crate::client::transport::{ApiRequest, Transport};
use crate::shared::auth::{ChangePasswordRequest, LoginRequest, RegisterRequest};
use crate::shared::User;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Loading,
    Authenticated,
    Anonymous,
}

/// Snapshot of the client session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub user: Option<User>,
    /// Last user-facing error, cleared by the next successful transition
    pub error: Option<String>,
}

impl SessionState {
    pub fn authenticated(user: User) -> Self {
        Self {
            phase: SessionPhase::Authenticated,
            user: Some(user),
            error: None,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            phase: SessionPhase::Anonymous,
            user: None,
            error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Loading
    }
}

struct Inner {
    api: AuthApi,
    state: watch::Sender<SessionState>,
    generation: Mutex<u64>,
    bootstrap_timeout: Duration,
}

impl Inner {
    /// Apply `update` as a new transition, making every older one stale.
    fn transition(&self, update: impl FnOnce(&mut SessionState)) -> u64 {
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        self.state.send_modify(update);
        *generation
    }

    /// Run `update` if `generation` is still the latest transition.
    fn apply_if_current(&self, generation: u64, update: impl FnOnce(&mut SessionState)) -> bool {
        let current = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != generation {
            tracing::debug!(stale = generation, current = *current, "dropping stale session result");
            return false;
        }
        self.state.send_modify(update);
        true
    }

    /// Leave `Loading` whatever the generation; other phases are kept.
    fn abandon_loading(&self) -> bool {
        self.state.send_if_modified(|state| {
            if !state.is_loading() {
                return false;
            }
            *state = SessionState::anonymous();
            true
        })
    }

    async fn resolve_session(&self) -> Option<User> {
        match self.api.me_without_recovery().await {
            Ok(user) => return Some(user),
            Err(e) if e.is_unauthorized() => {}
            Err(e) => {
                tracing::warn!("session check failed: {e}");
                return None;
            }
        }

        if let Err(e) = self.api.refresh().await {
            tracing::debug!("no resumable session: {e}");
            return None;
        }
        match self.api.me_without_recovery().await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("session check after refresh failed: {e}");
                None
            }
        }
    }
}

/// Session coordinator; clones share the same session.
#[derive(Clone)]
pub struct SessionCoordinator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("state", &*self.inner.state.borrow())
            .field("bootstrap_timeout", &self.inner.bootstrap_timeout)
            .finish()
    }
}

impl SessionCoordinator {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let bootstrap_timeout = config.bootstrap_timeout;
        let transport = Arc::new(Transport::new(config)?);
        let (state, _) = watch::channel(SessionState::default());

        Ok(Self {
            inner: Arc::new(Inner {
                api: AuthApi::new(transport),
                state,
                generation: Mutex::new(0),
                bootstrap_timeout,
            }),
        })
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn api(&self) -> &AuthApi {
        &self.inner.api
    }

    pub fn transport(&self) -> &Arc<Transport> {
        self.inner.api.transport()
    }

    /// Resume a session from cookies left by an earlier run.
    ///
    /// Returns once the check settles or the bootstrap timeout elapses,
    /// whichever comes first. The network call is not cancelled on timeout.
    pub async fn bootstrap(&self) -> SessionState {
        let generation = self.inner.transition(|state| {
            state.phase = SessionPhase::Loading;
            state.user = None;
        });

        let inner = Arc::clone(&self.inner);
        let mut attempt = tokio::spawn(async move {
            let user = inner.resolve_session().await;
            inner.apply_if_current(generation, |state| {
                *state = match user {
                    Some(user) => SessionState::authenticated(user),
                    None => SessionState::anonymous(),
                };
            });
        });

        match tokio::time::timeout(self.inner.bootstrap_timeout, &mut attempt).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!("session bootstrap task failed: {e}");
                self.inner.abandon_loading();
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.inner.bootstrap_timeout.as_millis() as u64,
                    "session bootstrap timed out, continuing as anonymous"
                );
                self.inner.abandon_loading();
            }
        }

        self.state()
    }

    pub async fn login(&self, credentials: LoginRequest) -> Result<User, ClientError> {
        let result = self.inner.api.login(&credentials).await;
        self.adopt(result)
    }

    pub async fn register(&self, details: RegisterRequest) -> Result<User, ClientError> {
        let result = self.inner.api.register(&details).await;
        self.adopt(result)
    }

    /// A success is a transition; a failure only records the error.
    fn adopt(&self, result: Result<User, ClientError>) -> Result<User, ClientError> {
        match &result {
            Ok(user) => {
                let user = user.clone();
                self.inner
                    .transition(|state| *state = SessionState::authenticated(user));
            }
            Err(e) => {
                let message = e.user_message();
                self.inner.state.send_modify(|state| state.error = Some(message));
            }
        }
        result
    }

    /// End the session locally. Server errors are logged, never returned.
    pub async fn logout(&self) {
        if let Err(e) = self.inner.api.logout().await {
            tracing::warn!("logout request failed: {e}");
        }

        self.transport().clear_session();
        self.inner.transition(|state| *state = SessionState::anonymous());
    }

    /// Revoke every session of this account, then log out locally.
    pub async fn logout_everywhere(&self) -> Result<u64, ClientError> {
        let revoked = self.send_checked(self.inner.api.revoke_all()).await?;
        self.logout().await;
        Ok(revoked)
    }

    /// Re-fetch the current user, refreshing the session if needed.
    pub async fn refresh_user(&self) -> Result<User, ClientError> {
        let user = self.send_checked(self.inner.api.me()).await?;
        self.inner.state.send_modify(|state| {
            if state.is_authenticated() {
                state.user = Some(user.clone());
            }
        });
        Ok(user)
    }

    pub async fn change_password(&self, change: ChangePasswordRequest) -> Result<User, ClientError> {
        let user = self.send_checked(self.inner.api.change_password(&change)).await?;
        self.inner.state.send_modify(|state| {
            state.error = None;
            if state.is_authenticated() {
                state.user = Some(user.clone());
            }
        });
        Ok(user)
    }

    /// Send an arbitrary API request through the interceptor.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        self.send_checked(self.transport().send(request)).await
    }

    /// A failed recovery means the session is gone: fall back to anonymous.
    async fn send_checked<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ClientError> {
        let result = call.await;
        if let Err(ClientError::RefreshFailed(e)) = &result {
            tracing::info!("session lost: {e}");
            let message = ClientError::RefreshFailed(e.clone()).user_message();
            self.inner.transition(|state| {
                *state = SessionState::anonymous();
                state.error = Some(message);
            });
        }
        result
    }
}
