/**
 * Server Initialization
 *
 * This module wires configuration, the credential store and the router
 * together, and starts the background purge of expired refresh tokens.
 *
 * # Initialization Process
 *
 * 1. Open the store (PostgreSQL when `DATABASE_URL` is set)
 * 2. Build `AppState`
 * 3. Start the purge task
 * 4. Create the router
 */

use std::time::Duration;

use axum::Router;
use tokio::task::JoinHandle;

use crate::backend::auth::AuthService;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_store, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
pub async fn create_app(config: &ServerConfig) -> Result<Router<()>, sqlx::Error> {
    tracing::info!("Initializing murmur backend server");

    let store = load_store(config.database_url.as_deref()).await?;
    let app_state = AppState::new(config, store);

    if let Some(interval) = config.purge_interval {
        spawn_purge_task(app_state.auth.clone(), interval);
        tracing::info!(interval_secs = interval.as_secs(), "expired refresh token purge scheduled");
    }

    Ok(create_router(app_state, &config.client_origin))
}

/// Periodically delete refresh tokens that expired without being presented.
pub fn spawn_purge_task(auth: AuthService, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // first tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            match auth.purge_expired_tokens().await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "purged expired refresh tokens"),
                Err(e) => tracing::warn!(error = %e, "refresh token purge failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::backend::auth::store::{AuthStore, MemoryStore};
    use crate::backend::auth::{AccessTokenIssuer, SessionPolicy};

    #[tokio::test(start_paused = true)]
    async fn test_purge_task_removes_expired_tokens() {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(
            store.clone(),
            AccessTokenIssuer::new(b"purge-secret", 900),
            SessionPolicy {
                bcrypt_cost: 4,
                ..SessionPolicy::default()
            },
        );
        let session = auth.register_user("ana", "ana@x.com", "secret1").await.unwrap();
        store
            .set_refresh_expiry_for(session.user.id, chrono::Utc::now() - chrono::Duration::seconds(1))
            .await;

        let handle = spawn_purge_task(auth, Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;

        assert_eq!(store.refresh_token_count().await, 0);
        assert!(store.find_user_by_id(session.user.id).await.unwrap().is_some());
        handle.abort();
    }
}
