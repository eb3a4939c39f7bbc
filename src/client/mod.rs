//! Native Session Client
//!
//! Keeps an authenticated session alive from a native (tokio) application.
//!
//! # Layers
//!
//! - **`transport`** - reqwest client with a clearable cookie store; turns a
//!   burst of 401s into a single refresh and replays each request once
//! - **`api`** - typed wrappers for the `/auth` endpoints
//! - **`session`** - session phases, bootstrap with a timeout, login,
//!   register and logout, published on a `watch` channel

/// Client configuration
pub mod config;

/// Client errors
pub mod error;

/// Session cookie store
pub mod cookies;

/// Single-flight refresh guard
pub mod refresh_gate;

/// HTTP transport with 401 recovery
pub mod transport;

/// Typed auth endpoints
pub mod api;

/// Session coordinator
pub mod session;

pub use api::AuthApi;
pub use config::ClientConfig;
pub use cookies::SessionCookieStore;
pub use error::ClientError;
pub use session::{SessionCoordinator, SessionPhase, SessionState};
pub use transport::{ApiRequest, Transport};
