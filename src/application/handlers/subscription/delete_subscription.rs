//! DeleteSubscriptionHandler - removes a subscription with its payments and
//! takes it off the customer's counters.

use std::sync::Arc;

use serde_json::json;

use crate::application::handlers::announce;
use crate::domain::foundation::{AggregateKind, DomainError, EventEnvelope, SubscriptionId, UserId};
use crate::ports::{EventPublisher, SubscriptionRepository};

use super::subscription_not_found;

#[derive(Debug, Clone)]
pub struct DeleteSubscriptionCommand {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
}

pub struct DeleteSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl DeleteSubscriptionHandler {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: DeleteSubscriptionCommand) -> Result<(), DomainError> {
        let subscription = self
            .repository
            .find(&cmd.user_id, &cmd.subscription_id)
            .await?
            .ok_or_else(|| subscription_not_found(&cmd.subscription_id))?;

        self.repository
            .delete(&subscription, subscription.removal())
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            subscription_id = %cmd.subscription_id,
            customer_id = %subscription.customer_id,
            "subscription deleted"
        );

        announce(
            self.event_publisher.as_ref(),
            EventEnvelope::new(
                cmd.user_id,
                AggregateKind::Subscription,
                "deleted",
                cmd.subscription_id,
                json!({
                    "id": cmd.subscription_id.to_string(),
                    "customer_id": subscription.customer_id.to_string(),
                }),
            ),
        )
        .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::subscription::test_support::open;
    use crate::application::handlers::test_support::{uid, Fixture};
    use crate::domain::foundation::{ErrorCode, Money};
    use crate::domain::subscription::BillingCycle;
    use crate::ports::CustomerRepository;

    #[tokio::test]
    async fn delete_decrements_counters_and_drops_payments() {
        let fx = Fixture::new();
        let (customer, sub) = open(&fx, "alice", 12_000, BillingCycle::Yearly).await;
        let handler = DeleteSubscriptionHandler::new(fx.store.clone(), fx.bus.clone());

        handler
            .handle(DeleteSubscriptionCommand {
                user_id: uid("alice"),
                subscription_id: sub.id,
            })
            .await
            .unwrap();

        let stored = CustomerRepository::find(fx.store.as_ref(), &uid("alice"), &customer.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.subscriptions, 0);
        assert_eq!(stored.total_value, Money::ZERO);
        assert!(fx
            .store
            .list_payments(&uid("alice"), &sub.id)
            .await
            .unwrap()
            .is_empty());
        assert!(fx.bus.has_event("subscription.deleted"));
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found() {
        let fx = Fixture::new();
        let (_, sub) = open(&fx, "alice", 1_000, BillingCycle::Monthly).await;
        let handler = DeleteSubscriptionHandler::new(fx.store.clone(), fx.bus.clone());
        let cmd = DeleteSubscriptionCommand {
            user_id: uid("alice"),
            subscription_id: sub.id,
        };

        handler.handle(cmd.clone()).await.unwrap();
        let err = handler.handle(cmd).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SubscriptionNotFound);
    }
}
