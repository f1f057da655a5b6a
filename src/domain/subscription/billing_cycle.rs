//! Billing cycle date arithmetic and monthly normalization.
//!
//! All dates are UTC. Adding months keeps the time of day and clamps to the
//! last day of the target month, so a subscription billed on Jan 31 is next
//! due on Feb 28 (or 29), and a yearly one billed on Feb 29 is due on Feb 28.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{DomainError, Money, Timestamp, ValidationError};

/// How often a subscription is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Yearly,
}

impl BillingCycle {
    /// Calendar months between two charges.
    pub fn months(&self) -> u32 {
        match self {
            BillingCycle::Monthly => 1,
            BillingCycle::Yearly => 12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }

    /// Advances `base` by one cycle.
    pub fn next_payment_date(&self, base: Timestamp) -> Result<Timestamp, DomainError> {
        base.add_calendar_months(self.months()).ok_or_else(|| {
            DomainError::validation("next_payment", format!("{} is out of range", base))
        })
    }

    /// First charge date when none is given.
    ///
    /// The 1st of next month at midnight, or the 1st of this month when today
    /// is already the 1st. Yearly subscriptions start one year after that.
    pub fn default_first_charge(&self, now: Timestamp) -> Result<Timestamp, DomainError> {
        let month_start = now.start_of_month();
        let first = if now.day_of_month() == 1 {
            month_start
        } else {
            BillingCycle::Monthly.next_payment_date(month_start)?
        };
        match self {
            BillingCycle::Monthly => Ok(first),
            BillingCycle::Yearly => self.next_payment_date(first),
        }
    }

    /// Monthly-equivalent value of `price`.
    ///
    /// Yearly prices are divided by 12 and rounded half away from zero to
    /// whole cents.
    pub fn monthly_value(&self, price: Money) -> Money {
        match self {
            BillingCycle::Monthly => price,
            BillingCycle::Yearly => price.divide_rounded(12),
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            other => Err(ValidationError::invalid_format(
                "billing_cycle",
                format!("expected monthly or yearly, got '{}'", other),
            )),
        }
    }
}
