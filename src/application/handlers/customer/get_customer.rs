//! GetCustomerHandler - Query handler for one customer and its subscriptions.

use std::sync::Arc;

use crate::domain::customer::Customer;
use crate::domain::foundation::{CustomerId, DomainError, ErrorCode, UserId};
use crate::domain::subscription::SubscriptionView;
use crate::ports::{CustomerRepository, SubscriptionRepository};

#[derive(Debug, Clone)]
pub struct GetCustomerQuery {
    pub user_id: UserId,
    pub customer_id: CustomerId,
}

#[derive(Debug, Clone)]
pub struct GetCustomerResult {
    pub customer: Customer,
    /// Newest first.
    pub subscriptions: Vec<SubscriptionView>,
}

pub struct GetCustomerHandler {
    customers: Arc<dyn CustomerRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl GetCustomerHandler {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            customers,
            subscriptions,
        }
    }

    pub async fn handle(&self, query: GetCustomerQuery) -> Result<GetCustomerResult, DomainError> {
        let customer = self
            .customers
            .find(&query.user_id, &query.customer_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::CustomerNotFound,
                    format!("Customer not found: {}", query.customer_id),
                )
            })?;

        let subscriptions = self
            .subscriptions
            .list_for_customer(&query.user_id, &query.customer_id)
            .await?;

        Ok(GetCustomerResult {
            customer,
            subscriptions,
        })
    }
}
