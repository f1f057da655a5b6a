//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `CustomerRepository` - Customers, scoped per tenant
//! - `SubscriptionRepository` - Subscriptions and payments, with ledger updates
//! - `AccountRepository` - Tenant profiles
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Announce persisted changes
//! - `ChangeFeed` - Per-tenant live stream of those changes
//!
//! ## External Service Ports
//!
//! - `SessionValidator` - Bearer token validation
//! - `PreapprovalProvider` - Payment authorization links

mod account_repository;
mod change_feed;
mod customer_repository;
mod event_publisher;
mod preapproval_provider;
mod session_validator;
mod subscription_repository;

pub use account_repository::AccountRepository;
pub use change_feed::ChangeFeed;
pub use customer_repository::CustomerRepository;
pub use event_publisher::EventPublisher;
pub use preapproval_provider::{
    Preapproval, PreapprovalError, PreapprovalProvider, PreapprovalRequest,
};
pub use session_validator::SessionValidator;
pub use subscription_repository::{same_revision, SubscriptionRepository};
