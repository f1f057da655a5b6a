//! HTTP handlers for customer endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::{customer_id, ApiError};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::customer::{
    CreateCustomerCommand, DeleteCustomerCommand, GetCustomerQuery, ListCustomersQuery,
};

use super::dto::{
    CreateCustomerRequest, CustomerDetailResponse, CustomerResponse, ListCustomersParams,
};

/// GET /api/customers - Newest first, optionally filtered
pub async fn list_customers(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ListCustomersParams>,
) -> Result<impl IntoResponse, ApiError> {
    let customers = state
        .list_customers_handler()
        .handle(ListCustomersQuery {
            user_id: user.id,
            search: params.search,
        })
        .await?;

    let response: Vec<CustomerResponse> =
        customers.into_iter().map(CustomerResponse::from).collect();
    Ok(Json(response))
}

/// POST /api/customers
pub async fn create_customer(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = state
        .create_customer_handler()
        .handle(CreateCustomerCommand {
            user_id: user.id,
            name: request.name,
            email: request.email,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CustomerResponse::from(customer))))
}

/// GET /api/customers/:id
pub async fn get_customer(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .get_customer_handler()
        .handle(GetCustomerQuery {
            user_id: user.id,
            customer_id: customer_id(&id)?,
        })
        .await?;

    Ok(Json(CustomerDetailResponse::from(result)))
}

/// DELETE /api/customers/:id - Refused while subscriptions reference it
pub async fn delete_customer(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .delete_customer_handler()
        .handle(DeleteCustomerCommand {
            user_id: user.id,
            customer_id: customer_id(&id)?,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
