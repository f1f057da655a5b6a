//! Route configuration for dashboard endpoints.

use axum::routing::get;
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::get_kpis;

/// Dashboard routes, mounted under `/api`.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard/kpis", get(get_kpis))
}
