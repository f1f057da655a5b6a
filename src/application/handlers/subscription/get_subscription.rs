//! GetSubscriptionHandler - one subscription joined with its customer.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, SubscriptionId, UserId};
use crate::domain::subscription::SubscriptionView;
use crate::ports::SubscriptionRepository;

use super::subscription_not_found;

#[derive(Debug, Clone)]
pub struct GetSubscriptionQuery {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
}

pub struct GetSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl GetSubscriptionHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetSubscriptionQuery) -> Result<SubscriptionView, DomainError> {
        self.repository
            .find_view(&query.user_id, &query.subscription_id)
            .await?
            .ok_or_else(|| subscription_not_found(&query.subscription_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::subscription::test_support::open;
    use crate::application::handlers::test_support::{uid, Fixture};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::subscription::BillingCycle;

    #[tokio::test]
    async fn joins_customer_contact() {
        let fx = Fixture::new();
        let (customer, sub) = open(&fx, "alice", 1_000, BillingCycle::Monthly).await;
        let handler = GetSubscriptionHandler::new(fx.store.clone());

        let view = handler
            .handle(GetSubscriptionQuery {
                user_id: uid("alice"),
                subscription_id: sub.id,
            })
            .await
            .unwrap();
        assert_eq!(view.customer_email, customer.email.as_str());

        let err = handler
            .handle(GetSubscriptionQuery {
                user_id: uid("bob"),
                subscription_id: sub.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SubscriptionNotFound);
    }
}
