//! HTTP handlers for subscription endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{subscription_id, ApiError};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::subscription::{
    CancelSubscriptionCommand, CreatePreapprovalCommand, CreateSubscriptionCommand,
    DeleteSubscriptionCommand, GetSubscriptionQuery, ListPaymentsQuery, ListSubscriptionsQuery,
    RecordPaymentCommand, TogglePauseCommand, UpdateSubscriptionCommand,
};

use super::dto::{
    CreatePreapprovalRequest, CreateSubscriptionRequest, ListSubscriptionsParams,
    PaymentResponse, RecordPaymentResponse, SubscriptionResponse, SubscriptionStateResponse,
    UpdateSubscriptionRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/subscriptions - Filtered by search text and status
pub async fn list_subscriptions(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ListSubscriptionsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let views = state
        .list_subscriptions_handler()
        .handle(ListSubscriptionsQuery {
            user_id: user.id,
            filter: params.into_query()?,
        })
        .await?;

    let response: Vec<SubscriptionResponse> =
        views.into_iter().map(SubscriptionResponse::from).collect();
    Ok(Json(response))
}

/// GET /api/subscriptions/:id
pub async fn get_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .get_subscription_handler()
        .handle(GetSubscriptionQuery {
            user_id: user.id,
            subscription_id: subscription_id(&id)?,
        })
        .await?;

    Ok(Json(SubscriptionResponse::from(view)))
}

/// GET /api/subscriptions/:id/payments - Newest first
pub async fn list_payments(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state
        .list_payments_handler()
        .handle(ListPaymentsQuery {
            user_id: user.id,
            subscription_id: subscription_id(&id)?,
        })
        .await?;

    let response: Vec<PaymentResponse> =
        payments.into_iter().map(PaymentResponse::from).collect();
    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/subscriptions
pub async fn create_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CreateSubscriptionCommand {
        user_id: user.id,
        customer: request.customer_ref()?,
        price: request.price()?,
        plan: request.plan,
        billing_cycle: request.billing_cycle,
        next_payment: request.next_payment,
    };

    let view = state.create_subscription_handler().handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(SubscriptionResponse::from(view))))
}

/// PATCH /api/subscriptions/:id
pub async fn update_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(request): Json<UpdateSubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .update_subscription_handler()
        .handle(UpdateSubscriptionCommand {
            user_id: user.id,
            subscription_id: subscription_id(&id)?,
            changes: request.into_changes()?,
        })
        .await?;

    Ok(Json(SubscriptionResponse::from(view)))
}

/// DELETE /api/subscriptions/:id - Removes its payments too
pub async fn delete_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .delete_subscription_handler()
        .handle(DeleteSubscriptionCommand {
            user_id: user.id,
            subscription_id: subscription_id(&id)?,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/subscriptions/:id/payments
pub async fn record_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .record_payment_handler()
        .handle(RecordPaymentCommand {
            user_id: user.id,
            subscription_id: subscription_id(&id)?,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RecordPaymentResponse::from(result))))
}

/// POST /api/subscriptions/:id/pause - Authorized ↔ paused
pub async fn toggle_pause(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = state
        .toggle_pause_handler()
        .handle(TogglePauseCommand {
            user_id: user.id,
            subscription_id: subscription_id(&id)?,
        })
        .await?;

    Ok(Json(SubscriptionStateResponse::from(subscription)))
}

/// POST /api/subscriptions/:id/cancel
pub async fn cancel_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = state
        .cancel_subscription_handler()
        .handle(CancelSubscriptionCommand {
            user_id: user.id,
            subscription_id: subscription_id(&id)?,
        })
        .await?;

    Ok(Json(SubscriptionStateResponse::from(subscription)))
}

/// POST /api/subscriptions/preapproval
pub async fn create_preapproval(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreatePreapprovalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let preapproval = state
        .create_preapproval_handler()
        .handle(CreatePreapprovalCommand {
            user_id: user.id,
            subscription_id: subscription_id(&request.subscription_id)?,
        })
        .await?;

    Ok(Json(preapproval))
}
