/**
 * Transport Interceptor
 *
 * Every API call goes through [`Transport::send`]. Responses other than 401
 * pass through untouched (decoded from the `{message, data}` envelope, or
 * mapped to a [`ClientError`]). A 401 is handled as follows:
 *
 * 1. A 401 from the refresh endpoint itself clears the cookie store and
 *    fails, so a dead refresh token can never loop.
 * 2. A request built without recovery, or one that is already a replay,
 *    fails with `Unauthorized`.
 * 3. Otherwise the request joins the [`RefreshGate`]: the first caller
 *    refreshes, concurrent callers wait for its outcome, and each request is
 *    replayed exactly once on success. On failure the cookie store is
 *    cleared and every waiter gets `RefreshFailed`.
 */

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::config::ClientConfig;
use crate::client::cookies::SessionCookieStore;
use crate::client::error::ClientError;
use crate::client::refresh_gate::{GateEntry, RefreshGate};
use crate::shared::auth::{ApiEnvelope, ErrorBody, REFRESH_PATH};
use crate::shared::User;

/// One API call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
    recover: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            recover: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Fail on 401 instead of refreshing and replaying.
    pub fn without_recovery(mut self) -> Self {
        self.recover = false;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn recovers(&self) -> bool {
        self.recover
    }

    fn is_refresh(&self) -> bool {
        self.path == REFRESH_PATH
    }
}

/// HTTP client with session cookies and single-flight refresh.
#[derive(Debug)]
pub struct Transport {
    http: reqwest::Client,
    config: ClientConfig,
    cookies: Arc<SessionCookieStore>,
    gate: RefreshGate,
}

impl Transport {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let cookies = Arc::new(SessionCookieStore::new());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            config,
            cookies,
            gate: RefreshGate::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cookies(&self) -> &SessionCookieStore {
        &self.cookies
    }

    pub fn gate(&self) -> &RefreshGate {
        &self.gate
    }

    /// Forget the local session.
    pub fn clear_session(&self) {
        self.cookies.clear();
    }

    /// Send `request` and decode the envelope's `data` as `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let seen = self.gate.generation();
        let response = self.dispatch(&request).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return decode(response).await;
        }

        let err = error_from(response).await;
        if request.is_refresh() {
            tracing::debug!("refresh endpoint rejected the session");
            self.cookies.clear();
            return Err(err);
        }
        if !request.recovers() {
            return Err(err);
        }

        tracing::debug!(path = %request.path, "401 received, recovering session");
        self.join_refresh(seen)
            .await
            .map_err(|e| ClientError::RefreshFailed(Box::new(e)))?;

        // replay once; a second 401 is final
        let replay = self.dispatch(&request).await?;
        decode(replay).await
    }

    /// Rotate the session cookies, sharing any refresh already in flight.
    pub async fn refresh_session(&self) -> Result<(), ClientError> {
        self.join_refresh(self.gate.generation()).await
    }

    async fn join_refresh(&self, seen: u64) -> Result<(), ClientError> {
        match self.gate.enter(seen) {
            GateEntry::AlreadyRefreshed => Ok(()),
            GateEntry::Follower(rx) => rx.await.unwrap_or_else(|_| {
                Err(ClientError::Http("session refresh was abandoned".to_string()))
            }),
            GateEntry::Leader(lease) => {
                let outcome = self.call_refresh().await;
                if let Err(e) = &outcome {
                    tracing::info!("session refresh failed: {e}");
                    self.cookies.clear();
                }
                lease.complete(outcome.clone());
                outcome
            }
        }
    }

    async fn call_refresh(&self) -> Result<(), ClientError> {
        let response = self.dispatch(&ApiRequest::post(REFRESH_PATH)).await?;
        let user: User = decode(response).await?;
        tracing::debug!(user_id = user.id, "session refreshed");
        Ok(())
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<reqwest::Response, ClientError> {
        let mut builder = self
            .http
            .request(request.method.clone(), self.config.url(&request.path));
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        Ok(builder.send().await?)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(error_from(response).await);
    }
    let envelope: ApiEnvelope<T> = response.json().await?;
    Ok(envelope.data)
}

async fn error_from(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.error, body.message),
        Err(_) => (
            status.canonical_reason().unwrap_or("Error").to_string(),
            if text.trim().is_empty() {
                status.to_string()
            } else {
                text
            },
        ),
    };

    if status == StatusCode::UNAUTHORIZED {
        ClientError::Unauthorized { code, message }
    } else {
        ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        }
    }
}
