//! Route configuration for account endpoints.

use axum::routing::{get, put};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{get_account, provision_account, update_theme};

/// Account routes, mounted under `/api`.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/account", get(get_account).post(provision_account))
        .route("/account/theme", put(update_theme))
}
