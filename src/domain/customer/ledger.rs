//! Counter adjustments for a customer's denormalized totals.
//!
//! A `LedgerChange` travels with every subscription write so the repository
//! can apply it in the same unit of work as the subscription row.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Money;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerChange {
    /// Change to the subscription count.
    pub subscriptions: i64,

    /// Change to the monthly-equivalent total.
    pub total_value: Money,
}

impl LedgerChange {
    pub const NONE: LedgerChange = LedgerChange {
        subscriptions: 0,
        total_value: Money::ZERO,
    };

    /// A subscription worth `monthly_value` was added.
    pub fn opened(monthly_value: Money) -> Self {
        Self {
            subscriptions: 1,
            total_value: monthly_value,
        }
    }

    /// A subscription was repriced or moved to another cycle.
    pub fn repriced(old_monthly: Money, new_monthly: Money) -> Self {
        Self {
            subscriptions: 0,
            total_value: new_monthly - old_monthly,
        }
    }

    /// A subscription worth `monthly_value` was deleted.
    pub fn closed(monthly_value: Money) -> Self {
        Self {
            subscriptions: -1,
            total_value: -monthly_value,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.subscriptions == 0 && self.total_value.is_zero()
    }
}
