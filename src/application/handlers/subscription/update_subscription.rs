//! UpdateSubscriptionHandler - Command handler for editing a subscription.
//!
//! Changing the price or cycle moves the customer's `total_value` by the
//! difference in monthly value.

use std::sync::Arc;

use crate::application::handlers::announce;
use crate::domain::foundation::{AggregateKind, DomainError, EventEnvelope, SubscriptionId, UserId};
use crate::domain::subscription::{SubscriptionChanges, SubscriptionView};
use crate::ports::{EventPublisher, SubscriptionRepository};

use super::subscription_not_found;

#[derive(Debug, Clone)]
pub struct UpdateSubscriptionCommand {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
    pub changes: SubscriptionChanges,
}

pub struct UpdateSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateSubscriptionHandler {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateSubscriptionCommand,
    ) -> Result<SubscriptionView, DomainError> {
        let mut view = self
            .repository
            .find_view(&cmd.user_id, &cmd.subscription_id)
            .await?
            .ok_or_else(|| subscription_not_found(&cmd.subscription_id))?;

        if cmd.changes.is_empty() {
            return Ok(view);
        }

        let previous = view.subscription.clone();
        let ledger = view.subscription.update(cmd.changes)?;
        self.repository
            .update(&previous, &view.subscription, ledger)
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            subscription_id = %cmd.subscription_id,
            value_delta = %ledger.total_value,
            "subscription updated"
        );

        let view = SubscriptionView::from_parts(
            view.subscription,
            view.customer_name,
            view.customer_email,
        );
        announce(
            self.event_publisher.as_ref(),
            EventEnvelope::for_record(
                cmd.user_id,
                AggregateKind::Subscription,
                "updated",
                cmd.subscription_id,
                &view,
            ),
        )
        .await;

        Ok(view)
    }
}
