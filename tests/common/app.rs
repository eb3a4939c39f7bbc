//! In-memory application helpers

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use serde_json::Value;
use tokio::task::JoinHandle;

use murmur::backend::auth::MemoryStore;
use murmur::backend::routes::router::create_router;
use murmur::backend::server::{AppState, ServerConfig};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Router plus a handle on its backing store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub config: ServerConfig,
}

/// Development config with a fixed secret and the cheapest bcrypt cost.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        jwt_secret: TEST_SECRET.to_string(),
        bcrypt_cost: 4,
        purge_interval: None,
        ..ServerConfig::default()
    }
}

pub fn test_app() -> TestApp {
    test_app_with(test_config())
}

pub fn test_app_with(config: ServerConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(&config, store.clone());
    TestApp {
        router: create_router(state, &config.client_origin),
        store,
        config,
    }
}

/// Serve `router` on 127.0.0.1 with an OS-assigned port.
pub async fn spawn_server(router: Router) -> (SocketAddr, JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    (addr, handle)
}

/// Build a request with an optional JSON body and `Cookie` header.
pub fn json_request(method: Method, uri: &str, body: Option<Value>, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Raw `Set-Cookie` headers of a response.
pub fn set_cookie_headers<B>(response: &Response<B>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// Value a response assigns to cookie `name`, if it sets one.
pub fn cookie_value<B>(response: &Response<B>, name: &str) -> Option<String> {
    set_cookie_headers(response).into_iter().find_map(|raw| {
        let pair = raw.split(';').next()?;
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim().to_string())
    })
}

/// `Cookie` header carrying both session cookies from a response.
pub fn session_cookie_header<B>(response: &Response<B>) -> String {
    let access = cookie_value(response, "accessToken").unwrap_or_default();
    let refresh = cookie_value(response, "refreshToken").unwrap_or_default();
    format!("accessToken={access}; refreshToken={refresh}")
}
