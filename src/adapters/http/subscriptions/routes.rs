//! Route configuration for subscription endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{
    cancel_subscription, create_preapproval, create_subscription, delete_subscription,
    get_subscription, list_payments, list_subscriptions, record_payment, toggle_pause,
    update_subscription,
};

/// Subscription routes, mounted under `/api`.
///
/// `/subscriptions/preapproval` is a static segment and wins over `:id`.
pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions",
            get(list_subscriptions).post(create_subscription),
        )
        .route("/subscriptions/preapproval", post(create_preapproval))
        .route(
            "/subscriptions/:id",
            get(get_subscription)
                .patch(update_subscription)
                .delete(delete_subscription),
        )
        .route(
            "/subscriptions/:id/payments",
            get(list_payments).post(record_payment),
        )
        .route("/subscriptions/:id/pause", post(toggle_pause))
        .route("/subscriptions/:id/cancel", post(cancel_subscription))
}
