//! HTTP adapters - REST API and live feed.
//!
//! Each resource has its own module with `dto`, `handlers` and `routes`;
//! `app` assembles them behind the auth middleware.

pub mod account;
pub mod app;
pub mod customers;
pub mod dashboard;
pub mod error;
pub mod live;
pub mod middleware;
pub mod pages;
pub mod state;
pub mod subscriptions;

pub use app::{build_router, routes};
pub use error::{ApiError, ErrorResponse};
pub use state::AppState;
