//! End-to-end: the session client against a live server on an ephemeral
//! port, backed by the in-memory store.

#![cfg(feature = "ssr")]

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::future::join_all;
use pretty_assertions::assert_eq;
use reqwest::Url;

use common::*;
use murmur::client::{ClientConfig, ClientError, SessionCoordinator, SessionPhase};
use murmur::shared::{ChangePasswordRequest, LoginRequest, RegisterRequest};

fn coordinator_for(addr: SocketAddr) -> SessionCoordinator {
    let config = ClientConfig::builder()
        .api_base_url(format!("http://{addr}/api"))
        .bootstrap_timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    SessionCoordinator::new(config).unwrap()
}

/// Simulate access-token expiry by dropping the client's access cookie.
fn expire_access_cookie(coordinator: &SessionCoordinator, addr: SocketAddr) {
    let url = Url::parse(&format!("http://{addr}/api")).unwrap();
    coordinator
        .transport()
        .cookies()
        .store_from_headers(["accessToken=; Max-Age=0; Path=/"], &url);
    assert!(coordinator.transport().cookies().get(&url, "accessToken").is_none());
}

fn ana() -> RegisterRequest {
    RegisterRequest {
        username: "ana".into(),
        email: "ana@x.com".into(),
        password: "secret1".into(),
    }
}

#[tokio::test]
async fn test_register_bootstrap_and_logout() {
    let app = test_app();
    let (addr, server) = spawn_server(app.router.clone()).await;

    let coordinator = coordinator_for(addr);
    assert_eq!(coordinator.bootstrap().await.phase, SessionPhase::Anonymous);

    let user = coordinator.register(ana()).await.unwrap();
    assert_eq!(user.username, "ana");
    assert!(coordinator.state().is_authenticated());

    // resumes from the cookies left by register
    let state = coordinator.bootstrap().await;
    assert!(state.is_authenticated());
    assert_eq!(state.user.unwrap().id, user.id);

    coordinator.logout().await;
    assert_eq!(coordinator.state().phase, SessionPhase::Anonymous);
    assert_eq!(app.store.refresh_token_count().await, 0);
    assert_eq!(coordinator.bootstrap().await.phase, SessionPhase::Anonymous);

    server.abort();
}

#[tokio::test]
async fn test_bootstrap_refreshes_expired_access_token() {
    let app = test_app();
    let (addr, server) = spawn_server(app.router.clone()).await;

    let coordinator = coordinator_for(addr);
    coordinator.register(ana()).await.unwrap();
    expire_access_cookie(&coordinator, addr);

    let state = coordinator.bootstrap().await;
    assert!(state.is_authenticated());
    assert_eq!(app.store.refresh_token_count().await, 1);

    server.abort();
}

#[tokio::test]
async fn test_concurrent_requests_rotate_refresh_token_once() {
    let app = test_app();
    let (addr, server) = spawn_server(app.router.clone()).await;

    let coordinator = coordinator_for(addr);
    let registered = coordinator.register(ana()).await.unwrap();
    expire_access_cookie(&coordinator, addr);

    let results = join_all((0..5).map(|_| coordinator.refresh_user())).await;
    for result in results {
        assert_eq!(result.unwrap().id, registered.id);
    }

    // a second rotation with the consumed secret would have failed and
    // cleared the session
    assert_eq!(coordinator.transport().gate().generation(), 1);
    assert_eq!(app.store.refresh_token_count().await, 1);
    assert!(coordinator.state().is_authenticated());

    server.abort();
}

#[tokio::test]
async fn test_revoked_session_cannot_be_recovered() {
    let app = test_app();
    let (addr, server) = spawn_server(app.router.clone()).await;

    let phone = coordinator_for(addr);
    let laptop = coordinator_for(addr);
    phone.register(ana()).await.unwrap();
    laptop
        .login(LoginRequest {
            email: "ana@x.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap();

    assert_eq!(laptop.logout_everywhere().await.unwrap(), 2);
    assert_eq!(laptop.state().phase, SessionPhase::Anonymous);

    // the phone still holds a valid access token until it expires
    assert!(phone.refresh_user().await.is_ok());

    expire_access_cookie(&phone, addr);
    let err = phone.refresh_user().await.unwrap_err();
    assert!(matches!(err, ClientError::RefreshFailed(_)));
    assert_eq!(err.code(), Some("InvalidTokenError"));
    assert_eq!(phone.state().phase, SessionPhase::Anonymous);
    assert!(phone.transport().cookies().is_empty());

    server.abort();
}

#[tokio::test]
async fn test_change_password_keeps_caller_signed_in() {
    let app = test_app();
    let (addr, server) = spawn_server(app.router.clone()).await;

    let coordinator = coordinator_for(addr);
    coordinator.register(ana()).await.unwrap();
    coordinator
        .change_password(ChangePasswordRequest {
            current_password: "secret1".into(),
            new_password: "secret2".into(),
        })
        .await
        .unwrap();

    expire_access_cookie(&coordinator, addr);
    assert!(coordinator.refresh_user().await.is_ok());

    let other = coordinator_for(addr);
    let err = other
        .login(LoginRequest {
            email: "ana@x.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some("InvalidCredentialsError"));

    server.abort();
}
