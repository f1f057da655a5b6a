//! EventPublisher port - Interface for publishing change events.
//!
//! This port defines how handlers announce changes without knowing about the
//! underlying transport (in-process broadcast, test recorder, ...).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing change events.
///
/// Publishing happens after the write has been persisted. A failed publish
/// is logged by the caller and never rolls the write back.
///
/// # Example
///
/// ```ignore
/// let event = EventEnvelope::for_record(user_id, AggregateKind::Customer, "created", id, &customer);
/// publisher.publish(event).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish multiple events in order.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_publisher_is_object_safe() {
        fn _accepts_dyn(_publisher: &dyn EventPublisher) {}
    }
}
