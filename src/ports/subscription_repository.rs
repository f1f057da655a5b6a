//! Subscription repository port.
//!
//! Writes carry the `LedgerChange` for the owning customer. Implementations
//! apply the subscription row and the customer counters in one unit of work
//! (a transaction, or a single lock scope), so the counters never drift.
//!
//! Mutating writes also take the `previous` snapshot the caller read. If the
//! stored row no longer matches it, the write fails with `Conflict` instead
//! of applying a ledger computed from stale data.

use async_trait::async_trait;

use crate::domain::customer::{Customer, LedgerChange};
use crate::domain::foundation::{CustomerId, DomainError, SubscriptionId, UserId};
use crate::domain::subscription::{Payment, Subscription, SubscriptionQuery, SubscriptionView};

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Persist a new subscription and open it on the customer's ledger.
    ///
    /// When `new_customer` is given it is inserted first, in the same unit
    /// of work.
    ///
    /// # Errors
    ///
    /// - `CustomerNotFound` if the referenced customer is not the tenant's
    /// - `DatabaseError` on persistence failure
    async fn create(
        &self,
        subscription: &Subscription,
        new_customer: Option<&Customer>,
        ledger: LedgerChange,
    ) -> Result<(), DomainError>;

    /// Replace `previous` with `updated` and apply `ledger`.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if it does not exist for this tenant
    /// - `Conflict` if it changed since `previous` was read
    async fn update(
        &self,
        previous: &Subscription,
        updated: &Subscription,
        ledger: LedgerChange,
    ) -> Result<(), DomainError>;

    /// Store `payment` together with the advanced subscription.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if it does not exist for this tenant
    /// - `Conflict` if it changed since `previous` was read
    async fn record_payment(
        &self,
        previous: &Subscription,
        updated: &Subscription,
        payment: &Payment,
    ) -> Result<(), DomainError>;

    /// Remove the subscription and its payments, closing it on the ledger.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if it does not exist for this tenant
    /// - `Conflict` if it changed since it was read
    async fn delete(&self, subscription: &Subscription, ledger: LedgerChange) -> Result<(), DomainError>;

    async fn find(
        &self,
        user_id: &UserId,
        id: &SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError>;

    /// Find a subscription joined with its customer.
    async fn find_view(
        &self,
        user_id: &UserId,
        id: &SubscriptionId,
    ) -> Result<Option<SubscriptionView>, DomainError>;

    /// Filtered list, newest first.
    async fn list(
        &self,
        user_id: &UserId,
        query: &SubscriptionQuery,
    ) -> Result<Vec<SubscriptionView>, DomainError>;

    /// All subscriptions of one customer, newest first.
    async fn list_for_customer(
        &self,
        user_id: &UserId,
        customer_id: &CustomerId,
    ) -> Result<Vec<SubscriptionView>, DomainError>;

    /// Every subscription the tenant has, in no particular order.
    async fn list_all(&self, user_id: &UserId) -> Result<Vec<Subscription>, DomainError>;

    /// Payments of one subscription, newest first.
    async fn list_payments(
        &self,
        user_id: &UserId,
        id: &SubscriptionId,
    ) -> Result<Vec<Payment>, DomainError>;
}

/// True when nothing was committed between reading `b` and checking `a`.
///
/// Writes replace the whole row, so any field that differs means a
/// concurrent change would be overwritten.
pub fn same_revision(a: &Subscription, b: &Subscription) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Money, Timestamp};
    use crate::domain::subscription::BillingCycle;

    #[test]
    fn subscription_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SubscriptionRepository) {}
    }

    #[test]
    fn any_committed_field_changes_revision() {
        let (a, _) = Subscription::create(
            UserId::new("u").unwrap(),
            CustomerId::new(),
            "Basic",
            Money::from_cents(100),
            BillingCycle::Monthly,
            None,
            Timestamp::now(),
        )
        .unwrap();
        let mut b = a.clone();
        assert!(same_revision(&a, &b));

        b.plan = "Gold".to_string();
        assert!(!same_revision(&a, &b));

        let mut c = a.clone();
        c.price = Money::from_cents(200);
        assert!(!same_revision(&a, &c));

        let mut d = a.clone();
        d.last_payment = Some(Timestamp::now());
        assert!(!same_revision(&a, &d));
    }
}
