//! DeleteCustomerHandler - Command handler for removing a customer.
//!
//! Only customers without subscriptions can be removed.

use std::sync::Arc;

use serde_json::json;

use crate::application::handlers::announce;
use crate::domain::foundation::{AggregateKind, CustomerId, DomainError, EventEnvelope, UserId};
use crate::ports::{CustomerRepository, EventPublisher};

#[derive(Debug, Clone)]
pub struct DeleteCustomerCommand {
    pub user_id: UserId,
    pub customer_id: CustomerId,
}

pub struct DeleteCustomerHandler {
    repository: Arc<dyn CustomerRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl DeleteCustomerHandler {
    pub fn new(
        repository: Arc<dyn CustomerRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: DeleteCustomerCommand) -> Result<(), DomainError> {
        self.repository.delete(&cmd.user_id, &cmd.customer_id).await?;

        tracing::info!(user_id = %cmd.user_id, customer_id = %cmd.customer_id, "customer deleted");

        announce(
            self.event_publisher.as_ref(),
            EventEnvelope::new(
                cmd.user_id,
                AggregateKind::Customer,
                "deleted",
                cmd.customer_id,
                json!({ "id": cmd.customer_id.to_string() }),
            ),
        )
        .await;

        Ok(())
    }
}
