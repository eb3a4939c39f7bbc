//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - An in-memory application (router + store) and a live server on an
//!   ephemeral port
//! - Request/response helpers for driving the router with `oneshot`
//! - wiremock responders shaped like the real API

#![allow(dead_code)]

#[cfg(feature = "ssr")]
pub mod app;
pub mod mock_server;

#[cfg(feature = "ssr")]
pub use app::*;
pub use mock_server::*;
