//! ListPaymentsHandler - payment history of one subscription, newest first.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, SubscriptionId, UserId};
use crate::domain::subscription::Payment;
use crate::ports::SubscriptionRepository;

use super::subscription_not_found;

#[derive(Debug, Clone)]
pub struct ListPaymentsQuery {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
}

pub struct ListPaymentsHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl ListPaymentsHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListPaymentsQuery) -> Result<Vec<Payment>, DomainError> {
        // An unknown subscription is a 404, not an empty history.
        if self
            .repository
            .find(&query.user_id, &query.subscription_id)
            .await?
            .is_none()
        {
            return Err(subscription_not_found(&query.subscription_id));
        }

        self.repository
            .list_payments(&query.user_id, &query.subscription_id)
            .await
    }
}
