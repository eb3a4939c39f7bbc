//! Backend Module
//!
//! This module contains all server-side code: the token issuance service,
//! the session middleware and the Axum HTTP server that exposes them.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - configuration, application state, initialization
//! - **`routes`** - router assembly
//! - **`auth`** - token issuance, persistence, cookies and handlers
//! - **`middleware`** - access-token gate for protected routes
//! - **`error`** - backend error taxonomy and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Thread Safety
//!
//! - `AppState` is `Clone` and shared by every handler
//! - `MemoryStore` serializes access with a tokio `RwLock`
//! - `PgStore` relies on the sqlx pool and transactions
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`; one `IntoResponse`
//! implementation maps every variant to a status and JSON body.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and session management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::create_app;
