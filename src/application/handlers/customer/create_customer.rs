//! CreateCustomerHandler - Command handler for adding a customer.

use std::sync::Arc;

use crate::application::handlers::announce;
use crate::domain::customer::Customer;
use crate::domain::foundation::{AggregateKind, DomainError, EventEnvelope, UserId};
use crate::ports::{CustomerRepository, EventPublisher};

#[derive(Debug, Clone)]
pub struct CreateCustomerCommand {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

pub struct CreateCustomerHandler {
    repository: Arc<dyn CustomerRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateCustomerHandler {
    pub fn new(
        repository: Arc<dyn CustomerRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: CreateCustomerCommand) -> Result<Customer, DomainError> {
        let customer = Customer::create(cmd.user_id, &cmd.name, &cmd.email)?;
        self.repository.create(&customer).await?;

        tracing::info!(
            user_id = %customer.user_id,
            customer_id = %customer.id,
            "customer created"
        );

        announce(
            self.event_publisher.as_ref(),
            EventEnvelope::for_record(
                customer.user_id.clone(),
                AggregateKind::Customer,
                "created",
                customer.id,
                &customer,
            ),
        )
        .await;

        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{uid, FailingPublisher, Fixture};
    use crate::domain::foundation::{ErrorCode, Money};

    fn command(name: &str, email: &str) -> CreateCustomerCommand {
        CreateCustomerCommand {
            user_id: uid("alice"),
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn creates_normalized_customer_with_zero_counters() {
        let fx = Fixture::new();
        let handler = CreateCustomerHandler::new(fx.store.clone(), fx.bus.clone());

        let customer = handler
            .handle(command("  ana   gómez ", " ana@example.com "))
            .await
            .unwrap();

        assert_eq!(customer.name.as_str(), "Ana Gómez");
        assert_eq!(customer.email.as_str(), "ana@example.com");
        assert_eq!(customer.subscriptions, 0);
        assert_eq!(customer.total_value, Money::ZERO);

        let stored = CustomerRepository::find(fx.store.as_ref(), &uid("alice"), &customer.id)
            .await
            .unwrap();
        assert_eq!(stored, Some(customer));
        assert!(fx.bus.has_event("customer.created"));
    }

    #[tokio::test]
    async fn rejects_invalid_contact() {
        let fx = Fixture::new();
        let handler = CreateCustomerHandler::new(fx.store.clone(), fx.bus.clone());

        let err = handler.handle(command("Ana", "not-an-email")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = handler.handle(command("   ", "ana@example.com")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(fx.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn publish_failure_does_not_fail_the_write() {
        let fx = Fixture::new();
        let handler = CreateCustomerHandler::new(fx.store.clone(), Arc::new(FailingPublisher));

        let customer = handler.handle(command("Ana", "ana@example.com")).await.unwrap();
        let stored = CustomerRepository::find(fx.store.as_ref(), &uid("alice"), &customer.id)
            .await
            .unwrap();
        assert!(stored.is_some());
    }
}
