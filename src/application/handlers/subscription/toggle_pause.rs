//! TogglePauseHandler - pauses an authorized subscription or resumes a
//! paused one.

use std::sync::Arc;

use crate::application::handlers::announce;
use crate::domain::customer::LedgerChange;
use crate::domain::foundation::{AggregateKind, DomainError, EventEnvelope, SubscriptionId, UserId};
use crate::domain::subscription::{Subscription, SubscriptionStatus};
use crate::ports::{EventPublisher, SubscriptionRepository};

use super::subscription_not_found;

#[derive(Debug, Clone)]
pub struct TogglePauseCommand {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
}

pub struct TogglePauseHandler {
    repository: Arc<dyn SubscriptionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl TogglePauseHandler {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: TogglePauseCommand) -> Result<Subscription, DomainError> {
        let mut subscription = self
            .repository
            .find(&cmd.user_id, &cmd.subscription_id)
            .await?
            .ok_or_else(|| subscription_not_found(&cmd.subscription_id))?;

        let previous = subscription.clone();
        let status = subscription.toggle_pause()?;
        self.repository
            .update(&previous, &subscription, LedgerChange::NONE)
            .await?;

        let action = match status {
            SubscriptionStatus::Paused => "paused",
            _ => "resumed",
        };
        tracing::info!(user_id = %cmd.user_id, subscription_id = %cmd.subscription_id, action, "subscription toggled");

        announce(
            self.event_publisher.as_ref(),
            EventEnvelope::for_record(
                cmd.user_id,
                AggregateKind::Subscription,
                action,
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
    use crate::domain::subscription::BillingCycle;

    #[tokio::test]
    async fn toggles_back_and_forth() {
        let fx = Fixture::new();
        let (_, sub) = open(&fx, "alice", 1_000, BillingCycle::Monthly).await;
        let handler = TogglePauseHandler::new(fx.store.clone(), fx.bus.clone());
        let cmd = TogglePauseCommand {
            user_id: uid("alice"),
            subscription_id: sub.id,
        };

        let paused = handler.handle(cmd.clone()).await.unwrap();
        assert_eq!(paused.status, SubscriptionStatus::Paused);
        let resumed = handler.handle(cmd).await.unwrap();
        assert_eq!(resumed.status, SubscriptionStatus::Authorized);

        assert!(fx.bus.has_event("subscription.paused"));
        assert!(fx.bus.has_event("subscription.resumed"));
    }

    #[tokio::test]
    async fn other_tenant_gets_not_found() {
        let fx = Fixture::new();
        let (_, sub) = open(&fx, "alice", 1_000, BillingCycle::Monthly).await;

        let err = TogglePauseHandler::new(fx.store.clone(), fx.bus.clone())
            .handle(TogglePauseCommand {
                user_id: uid("bob"),
                subscription_id: sub.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SubscriptionNotFound);
    }
}
