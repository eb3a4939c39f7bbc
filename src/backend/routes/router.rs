/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layers
 *
 * - `TraceLayer` - one span per request
 * - `CorsLayer` - credentialed requests from the configured client origin
 */

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::routes::api_routes::configure_auth_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Route Details
///
/// - `/api/auth/*` - authentication endpoints
/// - `GET /healthz` - liveness probe
/// - anything else - 404
pub fn create_router(app_state: AppState, client_origin: &str) -> Router<()> {
    let router = Router::new()
        .nest("/api", configure_auth_routes(app_state.clone()))
        .route("/healthz", get(healthz))
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(TraceLayer::new_for_http());

    let router = match cors_layer(client_origin) {
        Some(cors) => router.layer(cors),
        None => {
            tracing::warn!(origin = client_origin, "invalid CLIENT_ORIGIN; CORS disabled");
            router
        }
    };

    router.with_state(app_state)
}

fn cors_layer(client_origin: &str) -> Option<CorsLayer> {
    let origin = HeaderValue::from_str(client_origin).ok()?;
    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION])
            .max_age(Duration::from_secs(60 * 60)),
    )
}

async fn healthz() -> &'static str {
    "ok"
}
