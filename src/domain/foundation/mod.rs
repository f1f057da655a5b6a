//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the Cobri domain.

mod auth;
mod errors;
mod events;
mod ids;
mod money;
mod ownership;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{AggregateKind, EventEnvelope};
pub use ids::{CustomerId, EventId, PaymentId, SubscriptionId, UserId};
pub use money::Money;
pub use ownership::OwnedByUser;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
