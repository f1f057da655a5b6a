//! HTTP adapter for the caller's own account.
//!
//! - `POST /api/account` - Provision after sign-in (201 on first call)
//! - `GET /api/account` - Profile with trial status
//! - `PUT /api/account/theme` - Store theme preference

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::account_routes;
