//! Application handlers.
//!
//! One command or query handler per use case. Handlers load aggregates
//! through the repository ports, let the domain decide, persist, and then
//! announce the change on the `EventPublisher`.

pub mod account;
pub mod customer;
pub mod dashboard;
pub mod subscription;

#[cfg(test)]
pub(crate) mod test_support;

use crate::domain::foundation::EventEnvelope;
use crate::ports::EventPublisher;

/// Publishes a change event after the write has been committed.
///
/// The write already succeeded, so a failed publish only costs live clients
/// an update; it is logged and otherwise ignored.
pub(crate) async fn announce(publisher: &dyn EventPublisher, event: EventEnvelope) {
    let event_type = event.event_type.clone();
    if let Err(e) = publisher.publish(event).await {
        tracing::warn!(event_type = %event_type, error = %e, "failed to publish change event");
    }
}
