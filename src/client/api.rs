//! Typed calls for the `/auth` endpoints.

use std::sync::Arc;

use crate::client::error::ClientError;
use crate::client::transport::{ApiRequest, Transport};
use crate::shared::auth::{ChangePasswordRequest, LoginRequest, RegisterRequest, RevokedSessions};
use crate::shared::User;

/// Auth endpoint wrapper around a shared [`Transport`].
#[derive(Debug, Clone)]
pub struct AuthApi {
    transport: Arc<Transport>,
}

impl AuthApi {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    pub async fn register(&self, details: &RegisterRequest) -> Result<User, ClientError> {
        let request = ApiRequest::post("/auth/register")
            .json(details)?
            .without_recovery();
        self.transport.send(request).await
    }

    /// A 401 here means bad credentials, never an expired session.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<User, ClientError> {
        let request = ApiRequest::post("/auth/login")
            .json(credentials)?
            .without_recovery();
        self.transport.send(request).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.transport
            .send(ApiRequest::post("/auth/logout").without_recovery())
            .await
    }

    /// Rotate the session cookies.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        self.transport.refresh_session().await
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        self.transport.send(ApiRequest::get("/auth/me")).await
    }

    pub async fn me_without_recovery(&self) -> Result<User, ClientError> {
        self.transport
            .send(ApiRequest::get("/auth/me").without_recovery())
            .await
    }

    pub async fn change_password(&self, change: &ChangePasswordRequest) -> Result<User, ClientError> {
        let request = ApiRequest::post("/auth/password").json(change)?;
        self.transport.send(request).await
    }

    /// Revoke every session of the current user, returning how many were live.
    pub async fn revoke_all(&self) -> Result<u64, ClientError> {
        let revoked: RevokedSessions = self
            .transport
            .send(ApiRequest::post("/auth/sessions/revoke"))
            .await?;
        Ok(revoked.revoked)
    }
}
