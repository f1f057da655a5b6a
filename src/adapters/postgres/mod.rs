//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresCustomerRepository` - customers and their denormalized counters
//! - `PostgresSubscriptionRepository` - subscriptions, payments and ledger writes
//! - `PostgresAccountRepository` - tenant accounts

mod account_repository;
mod customer_repository;
mod pool;
mod subscription_repository;

pub use account_repository::PostgresAccountRepository;
pub use customer_repository::PostgresCustomerRepository;
pub use pool::connect;
pub use subscription_repository::PostgresSubscriptionRepository;
