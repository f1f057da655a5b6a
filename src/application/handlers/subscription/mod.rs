//! Subscription handlers.
//!
//! ## Commands
//! - Create (on an existing or inline-created customer)
//! - Update plan, price, cycle or due date
//! - Record a payment
//! - Pause/resume, cancel, delete
//! - Request a payment pre-approval link
//!
//! ## Queries
//! - List with search and status filter
//! - Get one, joined with its customer
//! - Payment history

mod cancel_subscription;
mod create_preapproval;
mod create_subscription;
mod delete_subscription;
mod get_subscription;
mod list_payments;
mod list_subscriptions;
mod record_payment;
mod toggle_pause;
mod update_subscription;

#[cfg(test)]
pub(crate) mod test_support;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId};

// Commands
pub use cancel_subscription::{CancelSubscriptionCommand, CancelSubscriptionHandler};
pub use create_preapproval::{CreatePreapprovalCommand, CreatePreapprovalHandler};
pub use create_subscription::{CreateSubscriptionCommand, CreateSubscriptionHandler, CustomerRef};
pub use delete_subscription::{DeleteSubscriptionCommand, DeleteSubscriptionHandler};
pub use record_payment::{RecordPaymentCommand, RecordPaymentHandler, RecordPaymentResult};
pub use toggle_pause::{TogglePauseCommand, TogglePauseHandler};
pub use update_subscription::{UpdateSubscriptionCommand, UpdateSubscriptionHandler};

// Queries
pub use get_subscription::{GetSubscriptionHandler, GetSubscriptionQuery};
pub use list_payments::{ListPaymentsHandler, ListPaymentsQuery};
pub use list_subscriptions::{ListSubscriptionsHandler, ListSubscriptionsQuery};

fn subscription_not_found(id: &SubscriptionId) -> DomainError {
    DomainError::new(
        ErrorCode::SubscriptionNotFound,
        format!("Subscription not found: {}", id),
    )
}
