//! Fixtures shared by handler tests.

use std::sync::Arc;

use crate::adapters::events::InMemoryEventBus;
use crate::adapters::memory::InMemoryStore;
use crate::domain::customer::Customer;
use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope, UserId};
use crate::ports::{CustomerRepository, EventPublisher};

pub fn uid(s: &str) -> UserId {
    UserId::new(s).unwrap()
}

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub bus: Arc<InMemoryEventBus>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }

    pub async fn customer(&self, owner: &str, name: &str) -> Customer {
        let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
        let customer = Customer::create(uid(owner), name, &email).unwrap();
        CustomerRepository::create(self.store.as_ref(), &customer)
            .await
            .unwrap();
        customer
    }
}

/// Publisher that always fails, for checking that writes survive it.
pub struct FailingPublisher;

#[async_trait::async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _event: EventEnvelope) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::InternalError, "bus down"))
    }
}
