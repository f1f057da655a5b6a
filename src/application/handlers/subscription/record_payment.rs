//! RecordPaymentHandler - Command handler for marking a cycle as paid.
//!
//! The payment settles the current due date (or today, when none is set)
//! and moves `next_payment` one billing cycle past it.

use std::sync::Arc;

use serde_json::json;

use crate::application::handlers::announce;
use crate::domain::foundation::{
    AggregateKind, DomainError, EventEnvelope, SubscriptionId, Timestamp, UserId,
};
use crate::domain::subscription::{Payment, Subscription};
use crate::ports::{EventPublisher, SubscriptionRepository};

use super::subscription_not_found;

#[derive(Debug, Clone)]
pub struct RecordPaymentCommand {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
}

#[derive(Debug, Clone)]
pub struct RecordPaymentResult {
    pub subscription: Subscription,
    pub payment: Payment,
}

pub struct RecordPaymentHandler {
    repository: Arc<dyn SubscriptionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RecordPaymentHandler {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: RecordPaymentCommand) -> Result<RecordPaymentResult, DomainError> {
        let mut subscription = self
            .repository
            .find(&cmd.user_id, &cmd.subscription_id)
            .await?
            .ok_or_else(|| subscription_not_found(&cmd.subscription_id))?;

        let previous = subscription.clone();
        let payment = subscription.record_payment(Timestamp::now())?;
        self.repository
            .record_payment(&previous, &subscription, &payment)
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            subscription_id = %cmd.subscription_id,
            amount = %payment.amount,
            covered_until = %payment.covered_until,
            "payment recorded"
        );

        announce(
            self.event_publisher.as_ref(),
            EventEnvelope::new(
                cmd.user_id,
                AggregateKind::Subscription,
                "payment_recorded",
                cmd.subscription_id,
                json!({ "subscription": &subscription, "payment": &payment }),
            ),
        )
        .await;

        Ok(RecordPaymentResult {
            subscription,
            payment,
        })
    }
}
