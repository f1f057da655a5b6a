//! CancelSubscriptionHandler - Command handler for cancelling a subscription.
//!
//! Cancellation is terminal. The subscription stays on the customer's
//! counters until it is deleted.

use std::sync::Arc;

use crate::application::handlers::announce;
use crate::domain::customer::LedgerChange;
use crate::domain::foundation::{AggregateKind, DomainError, EventEnvelope, SubscriptionId, UserId};
use crate::domain::subscription::Subscription;
use crate::ports::{EventPublisher, SubscriptionRepository};

use super::subscription_not_found;

#[derive(Debug, Clone)]
pub struct CancelSubscriptionCommand {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
}

pub struct CancelSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CancelSubscriptionHandler {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: CancelSubscriptionCommand) -> Result<Subscription, DomainError> {
        let mut subscription = self
            .repository
            .find(&cmd.user_id, &cmd.subscription_id)
            .await?
            .ok_or_else(|| subscription_not_found(&cmd.subscription_id))?;

        let previous = subscription.clone();
        subscription.cancel()?;
        self.repository
            .update(&previous, &subscription, LedgerChange::NONE)
            .await?;

        tracing::info!(user_id = %cmd.user_id, subscription_id = %cmd.subscription_id, "subscription cancelled");

        announce(
            self.event_publisher.as_ref(),
            EventEnvelope::for_record(
                cmd.user_id,
                AggregateKind::Subscription,
                "cancelled",
                cmd.subscription_id,
                &subscription,
            ),
        )
        .await;

        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::subscription::test_support::open;
    use crate::application::handlers::test_support::{uid, Fixture};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::subscription::{BillingCycle, SubscriptionStatus};

    #[tokio::test]
    async fn cancel_is_terminal() {
        let fx = Fixture::new();
        let (_, sub) = open(&fx, "alice", 1_000, BillingCycle::Monthly).await;
        let handler = CancelSubscriptionHandler::new(fx.store.clone(), fx.bus.clone());
        let cmd = CancelSubscriptionCommand {
            user_id: uid("alice"),
            subscription_id: sub.id,
        };

        let cancelled = handler.handle(cmd.clone()).await.unwrap();
        assert_eq!(cancelled.status, SubscriptionStatus::Cancelled);
        assert!(fx.bus.has_event("subscription.cancelled"));

        let err = handler.handle(cmd).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }
}
