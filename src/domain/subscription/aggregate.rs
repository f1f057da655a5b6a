//! Subscription aggregate.
//!
//! Every mutation that changes what the customer is worth per month returns
//! the matching `LedgerChange`, so callers persist the subscription and the
//! customer counters together.

use serde::{Deserialize, Serialize};

use crate::domain::customer::LedgerChange;
use crate::domain::foundation::{
    CustomerId, DomainError, ErrorCode, Money, OwnedByUser, PaymentId, StateMachine,
    SubscriptionId, Timestamp, UserId, ValidationError,
};

use super::{BillingCycle, Payment, SubscriptionStatus};

const MAX_PLAN_LEN: usize = 200;

/// A recurring charge for one customer.
///
/// # Invariants
///
/// - `customer_id` belongs to the same `user_id`
/// - `last_payment` is only set by `record_payment`
/// - A cancelled subscription never changes status again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,

    /// Tenant that owns this subscription.
    pub user_id: UserId,

    pub customer_id: CustomerId,

    /// Free-form plan name, e.g. "Premium".
    pub plan: String,

    /// Price charged per cycle.
    pub price: Money,

    pub billing_cycle: BillingCycle,

    pub status: SubscriptionStatus,

    pub last_payment: Option<Timestamp>,

    pub next_payment: Option<Timestamp>,

    pub created_at: Timestamp,
}

/// Partial update. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionChanges {
    pub plan: Option<String>,
    pub price: Option<Money>,
    pub billing_cycle: Option<BillingCycle>,
    pub next_payment: Option<Timestamp>,
}

impl SubscriptionChanges {
    pub fn is_empty(&self) -> bool {
        self.plan.is_none()
            && self.price.is_none()
            && self.billing_cycle.is_none()
            && self.next_payment.is_none()
    }
}

impl Subscription {
    /// Creates an authorized subscription.
    ///
    /// Without an explicit `next_payment` the first charge falls on the
    /// cycle's default start date relative to `now`.
    pub fn create(
        user_id: UserId,
        customer_id: CustomerId,
        plan: &str,
        price: Money,
        billing_cycle: BillingCycle,
        next_payment: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<(Self, LedgerChange), DomainError> {
        let plan = validate_plan(plan)?;
        validate_price(price)?;
        let next_payment = match next_payment {
            Some(date) => date,
            None => billing_cycle.default_first_charge(now)?,
        };

        let subscription = Self {
            id: SubscriptionId::new(),
            user_id,
            customer_id,
            plan,
            price,
            billing_cycle,
            status: SubscriptionStatus::Authorized,
            last_payment: None,
            next_payment: Some(next_payment),
            created_at: now,
        };
        let ledger = LedgerChange::opened(subscription.monthly_value());
        Ok((subscription, ledger))
    }

    /// Monthly-equivalent value of this subscription.
    pub fn monthly_value(&self) -> Money {
        self.billing_cycle.monthly_value(self.price)
    }

    /// Applies a partial update and returns the counter delta.
    pub fn update(&mut self, changes: SubscriptionChanges) -> Result<LedgerChange, DomainError> {
        let plan = changes.plan.as_deref().map(validate_plan).transpose()?;
        if let Some(price) = changes.price {
            validate_price(price)?;
        }

        let before = self.monthly_value();
        if let Some(plan) = plan {
            self.plan = plan;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(cycle) = changes.billing_cycle {
            self.billing_cycle = cycle;
        }
        if let Some(next) = changes.next_payment {
            self.next_payment = Some(next);
        }

        let change = LedgerChange::repriced(before, self.monthly_value());
        Ok(if change.is_noop() { LedgerChange::NONE } else { change })
    }

    /// Records a payment for the current due date and advances it one cycle.
    ///
    /// The settled due date is `next_payment`, or `now` when none was set.
    ///
    /// # Errors
    ///
    /// `InvalidStateTransition` if the subscription is cancelled.
    pub fn record_payment(&mut self, now: Timestamp) -> Result<Payment, DomainError> {
        if self.status == SubscriptionStatus::Cancelled {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Cannot record a payment on a cancelled subscription",
            )
            .with_detail("status", self.status.as_str()));
        }

        let base = self.next_payment.unwrap_or(now);
        let next = self.billing_cycle.next_payment_date(base)?;

        let payment = Payment {
            id: PaymentId::new(),
            subscription_id: self.id,
            user_id: self.user_id.clone(),
            paid_at: now,
            amount: self.price,
            covered_until: base,
        };
        self.last_payment = Some(now);
        self.next_payment = Some(next);
        Ok(payment)
    }

    /// Pauses an authorized subscription or resumes a paused one.
    pub fn toggle_pause(&mut self) -> Result<SubscriptionStatus, DomainError> {
        self.status = self.status.toggled()?;
        Ok(self.status)
    }

    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.status = self.status.transition_to(SubscriptionStatus::Cancelled)?;
        Ok(())
    }

    /// Counter delta for deleting this subscription.
    pub fn removal(&self) -> LedgerChange {
        LedgerChange::closed(self.monthly_value())
    }
}

impl OwnedByUser for Subscription {
    fn owner_id(&self) -> &UserId {
        &self.user_id
    }

    fn not_found_code() -> ErrorCode {
        ErrorCode::SubscriptionNotFound
    }
}

fn validate_plan(plan: &str) -> Result<String, ValidationError> {
    let plan = plan.trim();
    if plan.is_empty() {
        return Err(ValidationError::empty_field("plan"));
    }
    if plan.chars().count() > MAX_PLAN_LEN {
        return Err(ValidationError::invalid_format(
            "plan",
            format!("longer than {} characters", MAX_PLAN_LEN),
        ));
    }
    Ok(plan.to_string())
}

fn validate_price(price: Money) -> Result<(), ValidationError> {
    if price.is_negative() {
        return Err(ValidationError::out_of_range("price", 0, i64::MAX, price.cents()));
    }
    Ok(())
}
