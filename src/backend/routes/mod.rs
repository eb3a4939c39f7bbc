//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Architecture
//!
//! - **`router`** - main router creation, CORS and tracing layers
//! - **`api_routes`** - authentication endpoints and their middleware
//!
//! # Route Types
//!
//! ## API Routes
//!
//! - `POST /api/auth/register` - User registration
//! - `POST /api/auth/login` - User login
//! - `POST /api/auth/logout` - Logout
//! - `POST /api/auth/refresh` - Refresh token rotation
//! - `GET /api/auth/me` - Get current user
//! - `POST /api/auth/password` - Change password
//! - `POST /api/auth/sessions/revoke` - Revoke every session
//!
//! ## Other
//!
//! - `GET /healthz` - liveness probe

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
