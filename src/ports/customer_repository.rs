//! Customer repository port.
//!
//! Every method is scoped by the owning tenant. A customer owned by another
//! user is reported exactly like a missing one.

use async_trait::async_trait;

use crate::domain::customer::Customer;
use crate::domain::foundation::{CustomerId, DomainError, UserId};

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Persist a new customer.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(&self, customer: &Customer) -> Result<(), DomainError>;

    /// Find a customer owned by `user_id`.
    ///
    /// Returns `None` if it does not exist or belongs to someone else.
    async fn find(
        &self,
        user_id: &UserId,
        id: &CustomerId,
    ) -> Result<Option<Customer>, DomainError>;

    /// List the tenant's customers, newest first.
    ///
    /// `search` is matched case-insensitively against name or email.
    async fn list(&self, user_id: &UserId, search: Option<&str>) -> Result<Vec<Customer>, DomainError>;

    /// Delete a customer that has no subscriptions.
    ///
    /// The subscription count is re-checked in the same unit of work as the
    /// delete.
    ///
    /// # Errors
    ///
    /// - `CustomerNotFound` if it does not exist for this tenant
    /// - `CustomerHasSubscriptions` if subscriptions still reference it
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, user_id: &UserId, id: &CustomerId) -> Result<(), DomainError>;
}
