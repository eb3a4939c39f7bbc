//! Server Module
//!
//! This module contains the code that configures and starts the Axum HTTP
//! server.
//!
//! # Architecture
//!
//! - **`config`** - environment configuration and store loading
//! - **`state`** - `AppState` shared by handlers and middleware
//! - **`init`** - app creation and background tasks
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `ServerConfig::from_env()`
//! 2. **Store**: PostgreSQL when `DATABASE_URL` is set, in-memory otherwise
//! 3. **Background Tasks**: expired refresh token purge
//! 4. **Router Creation**: routes, auth middleware, CORS and tracing layers
//!
//! # Example
//!
//! ```rust,no_run
//! use murmur::backend::server::{config::ServerConfig, create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await?;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::ServerConfig;
pub use init::create_app;
pub use state::AppState;
