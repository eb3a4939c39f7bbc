//! murmur - Session Core
//!
//! murmur is the authentication session layer of a social application:
//! access/refresh token issuance and rotation on the server, and a client
//! that keeps a session alive across expiring access tokens.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between client and backend
//!   - User projection, request bodies, response envelopes
//!   - Input validation and configuration helpers
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Token issuance service with single-use refresh rotation
//!   - Session middleware (cookie or bearer access token)
//!   - Axum routes under `/api/auth`, PostgreSQL or in-memory storage
//!
//! - **`client`** - Native async client (not compiled for WASM)
//!   - Transport interceptor that refreshes once for a burst of 401s
//!   - Session coordinator with bootstrap, login, register and logout
//!
//! # Feature Flags
//!
//! - **`ssr`** - enables the backend modules and the `murmur-server` binary
//!
//! # Usage
//!
//! ## Server-Side
//!
//! ```rust,no_run
//! use murmur::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await?;
//! # let _ = app;
//! # Ok(())
//! # }
//! ```
//!
//! ## Client
//!
//! ```rust,no_run
//! use murmur::client::{ClientConfig, SessionCoordinator};
//!
//! # async fn example() -> Result<(), murmur::client::ClientError> {
//! let coordinator = SessionCoordinator::new(ClientConfig::from_env()?)?;
//! let state = coordinator.bootstrap().await;
//! println!("authenticated: {}", state.is_authenticated());
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - **Server**: `AppState` is cloned into every handler; stores are `Send + Sync`
//! - **Client**: the refresh gate and session state are safe to share across
//!   tasks on a multi-threaded runtime

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// Native session client
/// Only compiled for native targets (not WASM)
#[cfg(not(target_arch = "wasm32"))]
pub mod client;
