//! CreateSubscriptionHandler - Command handler for opening a subscription.
//!
//! The subscription either references an existing customer or brings a new
//! one along; in the latter case customer and subscription are stored in the
//! same repository call.

use std::sync::Arc;

use crate::application::handlers::announce;
use crate::domain::customer::{Customer, LedgerChange};
use crate::domain::foundation::{
    AggregateKind, CustomerId, DomainError, ErrorCode, EventEnvelope, Money, Timestamp, UserId,
};
use crate::domain::subscription::{BillingCycle, Subscription, SubscriptionView};
use crate::ports::{CustomerRepository, EventPublisher, SubscriptionRepository};

/// Who the subscription bills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerRef {
    Existing(CustomerId),
    New { name: String, email: String },
}

#[derive(Debug, Clone)]
pub struct CreateSubscriptionCommand {
    pub user_id: UserId,
    pub customer: CustomerRef,
    pub plan: String,
    pub price: Money,
    pub billing_cycle: BillingCycle,
    /// First due date; defaults to the cycle's first charge date.
    pub next_payment: Option<Timestamp>,
}

pub struct CreateSubscriptionHandler {
    customers: Arc<dyn CustomerRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateSubscriptionHandler {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            customers,
            subscriptions,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateSubscriptionCommand,
    ) -> Result<SubscriptionView, DomainError> {
        let (customer, is_new) = match cmd.customer {
            CustomerRef::Existing(id) => {
                let customer = self
                    .customers
                    .find(&cmd.user_id, &id)
                    .await?
                    .ok_or_else(|| {
                        DomainError::new(
                            ErrorCode::CustomerNotFound,
                            format!("Customer not found: {}", id),
                        )
                    })?;
                (customer, false)
            }
            CustomerRef::New { name, email } => {
                (Customer::create(cmd.user_id.clone(), &name, &email)?, true)
            }
        };

        let (subscription, ledger) = Subscription::create(
            cmd.user_id,
            customer.id,
            &cmd.plan,
            cmd.price,
            cmd.billing_cycle,
            cmd.next_payment,
            Timestamp::now(),
        )?;

        self.subscriptions
            .create(&subscription, is_new.then_some(&customer), ledger)
            .await?;
        let customer = self.committed_customer(customer, is_new, ledger).await;

        tracing::info!(
            user_id = %subscription.user_id,
            subscription_id = %subscription.id,
            customer_id = %customer.id,
            new_customer = is_new,
            "subscription created"
        );

        let view = SubscriptionView::new(subscription, &customer);
        let owner = view.subscription.user_id.clone();
        let customer_action = if is_new { "created" } else { "updated" };
        announce(
            self.event_publisher.as_ref(),
            EventEnvelope::for_record(
                owner.clone(),
                AggregateKind::Customer,
                customer_action,
                customer.id,
                &customer,
            ),
        )
        .await;
        announce(
            self.event_publisher.as_ref(),
            EventEnvelope::for_record(
                owner,
                AggregateKind::Subscription,
                "created",
                view.subscription.id,
                &view,
            ),
        )
        .await;

        Ok(view)
    }

    /// The customer's counters after the write. An existing customer is read
    /// back, since other writes may have landed since it was loaded.
    async fn committed_customer(
        &self,
        mut customer: Customer,
        is_new: bool,
        ledger: LedgerChange,
    ) -> Customer {
        if !is_new {
            match self.customers.find(&customer.user_id, &customer.id).await {
                Ok(Some(current)) => return current,
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(customer_id = %customer.id, error = %e, "customer re-read failed");
                }
            }
        }
        customer.apply(ledger);
        customer
    }
}
