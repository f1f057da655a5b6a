//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - sqlx repositories
//! - `memory` - in-process repositories (development and tests)
//! - `auth` - JWKS token validation and a mock validator
//! - `events` - broadcast bus behind the live feed, recorder for tests
//! - `preapproval` - payment authorization links
//! - `http` - axum REST API and WebSocket feed

pub mod auth;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod preapproval;
