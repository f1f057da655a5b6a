//! Subscription fixtures for handler tests.

use crate::application::handlers::test_support::{uid, Fixture};
use crate::domain::customer::Customer;
use crate::domain::foundation::{Money, Timestamp};
use crate::domain::subscription::{BillingCycle, Subscription};
use crate::ports::SubscriptionRepository;

/// Stores a fresh customer (name "Customer N") with one subscription.
pub async fn open(
    fx: &Fixture,
    owner: &str,
    cents: i64,
    cycle: BillingCycle,
) -> (Customer, Subscription) {
    let customer = Customer::create(
        uid(owner),
        &format!("Customer {}", cents),
        &format!("c{}@example.com", cents),
    )
    .unwrap();
    let (subscription, ledger) = Subscription::create(
        uid(owner),
        customer.id,
        "Pro",
        Money::from_cents(cents),
        cycle,
        None,
        Timestamp::now(),
    )
    .unwrap();
    SubscriptionRepository::create(fx.store.as_ref(), &subscription, Some(&customer), ledger)
        .await
        .unwrap();
    (customer, subscription)
}
