/**
 * Server Configuration
 *
 * This module loads the server configuration from environment variables
 * (a `.env` file is read by the binary before this runs) and opens the
 * credential store.
 *
 * # Variables
 *
 * | Variable | Default |
 * |---|---|
 * | `SERVER_PORT` | `5000` |
 * | `DATABASE_URL` | unset: in-memory store |
 * | `JWT_ACCESS_SECRET` | required when `APP_ENV=production` |
 * | `ACCESS_TOKEN_TTL_SECS` | `900`, at most one day |
 * | `REFRESH_TOKEN_TTL_DAYS` | `7`, at most 3650 |
 * | `BCRYPT_COST` | `10` |
 * | `COOKIE_SECURE` | on when `APP_ENV=production` |
 * | `CLIENT_ORIGIN` | `http://localhost:5173` |
 * | `PUBLIC_BASE_URL` | unset |
 * | `DEFAULT_AVATAR_URL` | unset |
 * | `TOKEN_PURGE_INTERVAL_SECS` | `3600`, `0` disables |
 */

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::backend::auth::refresh::generate_refresh_secret;
use crate::backend::auth::store::{AuthStore, MemoryStore, PgStore};
use crate::backend::auth::{CookieSettings, SessionPolicy};
use crate::shared::config::{env_bool, env_parse, normalize_base_url, ConfigError};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;
pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;
pub const MAX_ACCESS_TTL_SECS: i64 = 24 * 60 * 60;
pub const MAX_REFRESH_TTL_DAYS: i64 = 3650;
pub const DEFAULT_CLIENT_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_PURGE_INTERVAL_SECS: u64 = 60 * 60;

/// Resolved server settings
#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_days: i64,
    pub bcrypt_cost: u32,
    pub cookie_secure: bool,
    pub client_origin: String,
    pub public_base_url: Option<String>,
    pub default_avatar_url: Option<String>,
    /// `None` disables the expired-token purge task
    pub purge_interval: Option<Duration>,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("jwt_secret", &"<redacted>")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("cookie_secure", &self.cookie_secure)
            .field("client_origin", &self.client_origin)
            .field("public_base_url", &self.public_base_url)
            .field("default_avatar_url", &self.default_avatar_url)
            .field("purge_interval", &self.purge_interval)
            .finish()
    }
}

impl Default for ServerConfig {
    /// Development defaults with a random per-process signing secret.
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            jwt_secret: generate_refresh_secret(),
            access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
            refresh_ttl_days: DEFAULT_REFRESH_TTL_DAYS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            cookie_secure: false,
            client_origin: DEFAULT_CLIENT_ORIGIN.to_string(),
            public_base_url: None,
            default_avatar_url: None,
            purge_interval: Some(Duration::from_secs(DEFAULT_PURGE_INTERVAL_SECS)),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ServerConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let production = non_empty_var("APP_ENV")
            .map(|env| env.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let jwt_secret = match non_empty_var("JWT_ACCESS_SECRET") {
            Some(secret) => secret,
            None if production => return Err(ConfigError::MissingValue("JWT_ACCESS_SECRET")),
            None => {
                tracing::warn!("JWT_ACCESS_SECRET not set; using a random secret for this process");
                generate_refresh_secret()
            }
        };

        let access_ttl_secs = env_parse("ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?;
        let refresh_ttl_days = env_parse("REFRESH_TOKEN_TTL_DAYS", DEFAULT_REFRESH_TTL_DAYS)?;
        if !(1..=MAX_ACCESS_TTL_SECS).contains(&access_ttl_secs) {
            return Err(ConfigError::InvalidValue {
                key: "ACCESS_TOKEN_TTL_SECS",
                value: access_ttl_secs.to_string(),
            });
        }
        if !(1..=MAX_REFRESH_TTL_DAYS).contains(&refresh_ttl_days) {
            return Err(ConfigError::InvalidValue {
                key: "REFRESH_TOKEN_TTL_DAYS",
                value: refresh_ttl_days.to_string(),
            });
        }

        let bcrypt_cost = env_parse("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let client_origin = match non_empty_var("CLIENT_ORIGIN") {
            Some(origin) => normalize_base_url(&origin)?,
            None => DEFAULT_CLIENT_ORIGIN.to_string(),
        };
        let public_base_url = non_empty_var("PUBLIC_BASE_URL")
            .map(|url| normalize_base_url(&url))
            .transpose()?;

        let purge_secs = env_parse("TOKEN_PURGE_INTERVAL_SECS", DEFAULT_PURGE_INTERVAL_SECS)?;

        Ok(Self {
            port: env_parse("SERVER_PORT", DEFAULT_PORT)?,
            database_url: non_empty_var("DATABASE_URL"),
            jwt_secret,
            access_ttl_secs,
            refresh_ttl_days,
            bcrypt_cost,
            cookie_secure: env_bool("COOKIE_SECURE").unwrap_or(production),
            client_origin,
            public_base_url,
            default_avatar_url: non_empty_var("DEFAULT_AVATAR_URL"),
            purge_interval: (purge_secs > 0).then(|| Duration::from_secs(purge_secs)),
        })
    }

    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy {
            refresh_ttl: chrono::Duration::days(self.refresh_ttl_days),
            bcrypt_cost: self.bcrypt_cost,
            default_avatar_url: self.default_avatar_url.clone(),
            public_base_url: self.public_base_url.clone(),
        }
    }

    pub fn cookie_settings(&self) -> CookieSettings {
        CookieSettings {
            secure: self.cookie_secure,
            access_max_age_secs: self.access_ttl_secs,
            refresh_max_age_secs: self.refresh_ttl_days * 24 * 60 * 60,
        }
    }
}

/// Open the credential store.
///
/// Without `DATABASE_URL` the server runs on an in-memory store and every
/// account is lost on restart. A configured database that cannot be reached
/// is a startup error.
pub async fn load_store(database_url: Option<&str>) -> Result<Arc<dyn AuthStore>, sqlx::Error> {
    let Some(database_url) = database_url else {
        tracing::warn!("DATABASE_URL not set. Using the in-memory store; accounts will not persist.");
        return Ok(Arc::new(MemoryStore::new()));
    };

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url).await?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(()) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {e}");
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Ok(Arc::new(PgStore::new(pool)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "APP_ENV",
        "JWT_ACCESS_SECRET",
        "ACCESS_TOKEN_TTL_SECS",
        "REFRESH_TOKEN_TTL_DAYS",
        "BCRYPT_COST",
        "COOKIE_SECURE",
        "CLIENT_ORIGIN",
        "PUBLIC_BASE_URL",
        "DEFAULT_AVATAR_URL",
        "TOKEN_PURGE_INTERVAL_SECS",
        "SERVER_PORT",
        "DATABASE_URL",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.access_ttl_secs, 900);
        assert_eq!(config.refresh_ttl_days, 7);
        assert!(!config.cookie_secure);
        assert_eq!(config.client_origin, "http://localhost:5173");
        assert_eq!(config.jwt_secret.len(), 128);
        assert!(config.database_url.is_none());
        assert_eq!(config.cookie_settings().refresh_max_age_secs, 604_800);
    }

    #[test]
    #[serial]
    fn test_production_requires_secret_and_secures_cookies() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        assert_eq!(
            ServerConfig::from_env().unwrap_err(),
            ConfigError::MissingValue("JWT_ACCESS_SECRET")
        );

        std::env::set_var("JWT_ACCESS_SECRET", "prod-secret");
        let config = ServerConfig::from_env().unwrap();
        assert!(config.cookie_secure);
        assert_eq!(config.jwt_secret, "prod-secret");

        std::env::set_var("COOKIE_SECURE", "false");
        assert!(!ServerConfig::from_env().unwrap().cookie_secure);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_errors() {
        clear_env();
        std::env::set_var("ACCESS_TOKEN_TTL_SECS", "soon");
        assert!(matches!(
            ServerConfig::from_env(),
            Err(ConfigError::InvalidValue { key: "ACCESS_TOKEN_TTL_SECS", .. })
        ));
        clear_env();

        std::env::set_var("BCRYPT_COST", "2");
        assert!(matches!(
            ServerConfig::from_env(),
            Err(ConfigError::InvalidValue { key: "BCRYPT_COST", .. })
        ));
        clear_env();

        std::env::set_var("PUBLIC_BASE_URL", "api.example.com");
        assert!(matches!(ServerConfig::from_env(), Err(ConfigError::InvalidUrl(_))));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_token_lifetimes_are_bounded() {
        for (key, value) in [
            ("REFRESH_TOKEN_TTL_DAYS", "0"),
            ("REFRESH_TOKEN_TTL_DAYS", "3651"),
            ("REFRESH_TOKEN_TTL_DAYS", "9223372036854775807"),
            ("ACCESS_TOKEN_TTL_SECS", "-5"),
            ("ACCESS_TOKEN_TTL_SECS", "86401"),
        ] {
            clear_env();
            std::env::set_var(key, value);
            match ServerConfig::from_env() {
                Err(ConfigError::InvalidValue { key: rejected, .. }) => assert_eq!(rejected, key, "{value}"),
                other => panic!("{key}={value} accepted: {:?}", other.map(|_| ())),
            }
        }

        clear_env();
        std::env::set_var("REFRESH_TOKEN_TTL_DAYS", "3650");
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.session_policy().refresh_ttl, chrono::Duration::days(3650));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_purge_interval_zero_disables() {
        clear_env();
        std::env::set_var("TOKEN_PURGE_INTERVAL_SECS", "0");
        assert!(ServerConfig::from_env().unwrap().purge_interval.is_none());
        clear_env();
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ServerConfig {
            jwt_secret: "do-not-print".to_string(),
            database_url: Some("postgres://user:pw@db/app".to_string()),
            ..ServerConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("do-not-print"));
        assert!(!debug.contains("pw@db"));
    }

    #[tokio::test]
    async fn test_load_store_without_database_is_memory() {
        let store = load_store(None).await.unwrap();
        assert!(store.find_user_by_id(1).await.unwrap().is_none());
    }
}
