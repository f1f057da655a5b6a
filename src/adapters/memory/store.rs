//! In-memory storage for customers, subscriptions, payments and accounts.
//!
//! One `RwLock` guards all tables, so a subscription write and its customer
//! ledger update happen under the same guard. Used in development when no
//! database is configured, and by handler and HTTP tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::account::Account;
use crate::domain::customer::{Customer, LedgerChange};
use crate::domain::foundation::{
    CustomerId, DomainError, ErrorCode, OwnedByUser, SubscriptionId, UserId,
};
use crate::domain::subscription::{Payment, Subscription, SubscriptionQuery, SubscriptionView};
use crate::ports::{same_revision, AccountRepository, CustomerRepository, SubscriptionRepository};

#[derive(Default)]
struct Tables {
    customers: HashMap<CustomerId, Customer>,
    subscriptions: HashMap<SubscriptionId, Subscription>,
    payments: HashMap<SubscriptionId, Vec<Payment>>,
    accounts: HashMap<UserId, Account>,
}

impl Tables {
    fn customer(&self, user_id: &UserId, id: &CustomerId) -> Option<&Customer> {
        self.customers.get(id).filter(|c| c.is_owner(user_id))
    }

    fn customer_mut(&mut self, user_id: &UserId, id: &CustomerId) -> Result<&mut Customer, DomainError> {
        self.customers
            .get_mut(id)
            .filter(|c| c.is_owner(user_id))
            .ok_or_else(|| customer_not_found(id))
    }

    fn subscription(&self, user_id: &UserId, id: &SubscriptionId) -> Option<&Subscription> {
        self.subscriptions.get(id).filter(|s| s.is_owner(user_id))
    }

    /// Fails unless the stored row matches `expected`.
    fn check_current(&self, expected: &Subscription) -> Result<(), DomainError> {
        match self.subscription(&expected.user_id, &expected.id) {
            None => Err(subscription_not_found(&expected.id)),
            Some(current) if !same_revision(current, expected) => Err(DomainError::new(
                ErrorCode::Conflict,
                "Subscription was modified concurrently, reload and retry",
            )
            .with_detail("subscription_id", expected.id.to_string())),
            Some(_) => Ok(()),
        }
    }

    fn view(&self, subscription: &Subscription) -> Option<SubscriptionView> {
        self.customers
            .get(&subscription.customer_id)
            .map(|c| SubscriptionView::new(subscription.clone(), c))
    }

    fn apply_ledger(
        &mut self,
        user_id: &UserId,
        customer_id: &CustomerId,
        ledger: LedgerChange,
    ) -> Result<(), DomainError> {
        if ledger.is_noop() {
            return Ok(());
        }
        self.customer_mut(user_id, customer_id)?.apply(ledger);
        Ok(())
    }
}

/// Shared in-memory implementation of every repository port.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, DomainError> {
        self.tables
            .read()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "in-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, DomainError> {
        self.tables
            .write()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "in-memory store lock poisoned"))
    }
}

fn customer_not_found(id: &CustomerId) -> DomainError {
    DomainError::new(ErrorCode::CustomerNotFound, format!("Customer not found: {}", id))
}

fn subscription_not_found(id: &SubscriptionId) -> DomainError {
    DomainError::new(
        ErrorCode::SubscriptionNotFound,
        format!("Subscription not found: {}", id),
    )
}

/// Sorts descending; equal timestamps keep the later-inserted item first.
fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> crate::domain::foundation::Timestamp) {
    items.reverse();
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

#[async_trait]
impl CustomerRepository for InMemoryStore {
    async fn create(&self, customer: &Customer) -> Result<(), DomainError> {
        self.write()?.customers.insert(customer.id, customer.clone());
        Ok(())
    }

    async fn find(&self, user_id: &UserId, id: &CustomerId) -> Result<Option<Customer>, DomainError> {
        Ok(self.read()?.customer(user_id, id).cloned())
    }

    async fn list(&self, user_id: &UserId, search: Option<&str>) -> Result<Vec<Customer>, DomainError> {
        let tables = self.read()?;
        let mut out: Vec<Customer> = tables
            .customers
            .values()
            .filter(|c| c.is_owner(user_id))
            .filter(|c| c.matches_search(search.unwrap_or("")))
            .cloned()
            .collect();
        newest_first(&mut out, |c| c.created_at);
        Ok(out)
    }

    async fn delete(&self, user_id: &UserId, id: &CustomerId) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        let customer = tables
            .customer(user_id, id)
            .ok_or_else(|| customer_not_found(id))?;
        customer.ensure_deletable()?;
        tables.customers.remove(id);
        Ok(())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn create(
        &self,
        subscription: &Subscription,
        new_customer: Option<&Customer>,
        ledger: LedgerChange,
    ) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        let owner_matches = |c: &Customer| {
            c.id == subscription.customer_id && c.user_id == subscription.user_id
        };
        let known = new_customer.map(owner_matches).unwrap_or(false)
            || tables
                .customer(&subscription.user_id, &subscription.customer_id)
                .is_some();
        if !known {
            return Err(customer_not_found(&subscription.customer_id));
        }

        if let Some(customer) = new_customer {
            tables.customers.insert(customer.id, customer.clone());
        }
        tables.apply_ledger(&subscription.user_id, &subscription.customer_id, ledger)?;
        tables
            .subscriptions
            .insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn update(
        &self,
        previous: &Subscription,
        updated: &Subscription,
        ledger: LedgerChange,
    ) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        tables.check_current(previous)?;
        tables.apply_ledger(&updated.user_id, &updated.customer_id, ledger)?;
        tables.subscriptions.insert(updated.id, updated.clone());
        Ok(())
    }

    async fn record_payment(
        &self,
        previous: &Subscription,
        updated: &Subscription,
        payment: &Payment,
    ) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        tables.check_current(previous)?;
        tables.subscriptions.insert(updated.id, updated.clone());
        tables
            .payments
            .entry(updated.id)
            .or_default()
            .push(payment.clone());
        Ok(())
    }

    async fn delete(&self, subscription: &Subscription, ledger: LedgerChange) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        tables.check_current(subscription)?;
        tables.apply_ledger(&subscription.user_id, &subscription.customer_id, ledger)?;
        tables.subscriptions.remove(&subscription.id);
        tables.payments.remove(&subscription.id);
        Ok(())
    }

    async fn find(
        &self,
        user_id: &UserId,
        id: &SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self.read()?.subscription(user_id, id).cloned())
    }

    async fn find_view(
        &self,
        user_id: &UserId,
        id: &SubscriptionId,
    ) -> Result<Option<SubscriptionView>, DomainError> {
        let tables = self.read()?;
        Ok(tables.subscription(user_id, id).and_then(|s| tables.view(s)))
    }

    async fn list(
        &self,
        user_id: &UserId,
        query: &SubscriptionQuery,
    ) -> Result<Vec<SubscriptionView>, DomainError> {
        let tables = self.read()?;
        let views = tables
            .subscriptions
            .values()
            .filter(|s| s.is_owner(user_id))
            .filter_map(|s| tables.view(s));
        Ok(query.apply(views))
    }

    async fn list_for_customer(
        &self,
        user_id: &UserId,
        customer_id: &CustomerId,
    ) -> Result<Vec<SubscriptionView>, DomainError> {
        let tables = self.read()?;
        let views = tables
            .subscriptions
            .values()
            .filter(|s| s.is_owner(user_id) && &s.customer_id == customer_id)
            .filter_map(|s| tables.view(s));
        Ok(SubscriptionQuery::default().apply(views))
    }

    async fn list_all(&self, user_id: &UserId) -> Result<Vec<Subscription>, DomainError> {
        Ok(self
            .read()?
            .subscriptions
            .values()
            .filter(|s| s.is_owner(user_id))
            .cloned()
            .collect())
    }

    async fn list_payments(
        &self,
        user_id: &UserId,
        id: &SubscriptionId,
    ) -> Result<Vec<Payment>, DomainError> {
        let tables = self.read()?;
        let mut payments: Vec<Payment> = tables
            .payments
            .get(id)
            .map(|p| p.iter().filter(|p| p.is_owner(user_id)).cloned().collect())
            .unwrap_or_default();
        newest_first(&mut payments, |p| p.paid_at);
        Ok(payments)
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn find(&self, user_id: &UserId) -> Result<Option<Account>, DomainError> {
        Ok(self.read()?.accounts.get(user_id).cloned())
    }

    async fn create(&self, account: &Account) -> Result<Account, DomainError> {
        let mut tables = self.write()?;
        let stored = tables
            .accounts
            .entry(account.user_id.clone())
            .or_insert_with(|| account.clone());
        Ok(stored.clone())
    }

    async fn update(&self, account: &Account) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        match tables.accounts.get_mut(&account.user_id) {
            Some(stored) => {
                *stored = account.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::AccountNotFound,
                format!("Account not found: {}", account.user_id),
            )),
        }
    }
}
