//! HTTP DTOs for customer endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::customer::GetCustomerResult;
use crate::domain::customer::Customer;
use crate::domain::foundation::{Money, Timestamp};

use crate::adapters::http::subscriptions::dto::SubscriptionResponse;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCustomersParams {
    /// Case-insensitive substring of name or email.
    pub search: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Avatar initials derived from the name.
    pub initials: String,
    pub subscriptions: i64,
    /// Monthly-equivalent revenue, as a decimal amount.
    pub total_value: Money,
    pub created_at: Timestamp,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id.to_string(),
            initials: customer.name.initials(),
            name: customer.name.as_str().to_string(),
            email: customer.email.as_str().to_string(),
            subscriptions: customer.subscriptions,
            total_value: customer.total_value,
            created_at: customer.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerDetailResponse {
    #[serde(flatten)]
    pub customer: CustomerResponse,
    pub subscription_list: Vec<SubscriptionResponse>,
}

impl From<GetCustomerResult> for CustomerDetailResponse {
    fn from(result: GetCustomerResult) -> Self {
        Self {
            customer: result.customer.into(),
            subscription_list: result
                .subscriptions
                .into_iter()
                .map(SubscriptionResponse::from)
                .collect(),
        }
    }
}
