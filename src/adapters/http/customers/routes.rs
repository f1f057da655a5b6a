//! Route configuration for customer endpoints.

use axum::routing::get;
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{create_customer, delete_customer, get_customer, list_customers};

/// Customer routes, mounted under `/api`.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/:id", get(get_customer).delete(delete_customer))
}
