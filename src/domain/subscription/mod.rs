//! Subscription domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - Subscription entity and its mutations
//! - `billing_cycle` - Cycle date arithmetic and monthly normalization
//! - `listing` - Joined read model and list filtering
//! - `payment` - Recorded payments
//! - `status` - SubscriptionStatus state machine and list filter

mod aggregate;
mod billing_cycle;
mod listing;
mod payment;
mod status;

pub use aggregate::{Subscription, SubscriptionChanges};
pub use billing_cycle::BillingCycle;
pub use listing::{SubscriptionQuery, SubscriptionView};
pub use payment::Payment;
pub use status::{StatusFilter, SubscriptionStatus};
