//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Response type aliases
//! ├── register.rs  - User registration handler
//! ├── login.rs     - User authentication handler
//! ├── logout.rs    - Refresh token revocation handler
//! ├── refresh.rs   - Refresh token rotation handler
//! ├── me.rs        - Get current user handler
//! ├── password.rs  - Password change handler
//! └── sessions.rs  - Revoke-all handler
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register
//! - **`login`** - POST /api/auth/login
//! - **`logout`** - POST /api/auth/logout
//! - **`refresh`** - POST /api/auth/refresh
//! - **`get_me`** - GET /api/auth/me (access token required)
//! - **`change_password`** - POST /api/auth/password (access token required)
//! - **`revoke_all`** - POST /api/auth/sessions/revoke (access token required)
//!
//! # Session Flow
//!
//! 1. **Register / Login**: credentials → access + refresh cookies
//! 2. **Authenticated calls**: access cookie verified by `require_auth`
//! 3. **Refresh**: refresh cookie rotated → new access + refresh cookies
//! 4. **Logout**: refresh record deleted, cookies cleared

/// Response type aliases
pub mod types;

/// Register handler
pub mod register;

/// Login handler
pub mod login;

/// Logout handler
pub mod logout;

/// Refresh handler
pub mod refresh;

/// Get current user handler
pub mod me;

/// Change password handler
pub mod password;

/// Revoke-all handler
pub mod sessions;

pub use login::login;
pub use logout::logout;
pub use me::get_me;
pub use password::change_password;
pub use refresh::refresh;
pub use register::register;
pub use sessions::revoke_all;
