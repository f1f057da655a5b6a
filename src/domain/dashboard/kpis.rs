use serde::Serialize;

use crate::domain::foundation::{Money, Timestamp};
use crate::domain::subscription::{Subscription, SubscriptionStatus};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardKpis {
    pub active: u64,
    pub paused: u64,
    pub cancelled: u64,
    pub pending: u64,

    /// Monthly recurring revenue of authorized subscriptions.
    pub mrr: Money,

    /// MRR of the authorized subscriptions that already existed when the
    /// current month started.
    pub previous_mrr: Money,

    /// Month-over-month change in percent, one decimal. Zero without a baseline.
    pub growth: f64,
}

impl DashboardKpis {
    pub fn compute<'a>(
        subscriptions: impl IntoIterator<Item = &'a Subscription>,
        now: Timestamp,
    ) -> Self {
        let month_start = now.start_of_month();
        let mut kpis = Self {
            active: 0,
            paused: 0,
            cancelled: 0,
            pending: 0,
            mrr: Money::ZERO,
            previous_mrr: Money::ZERO,
            growth: 0.0,
        };

        for sub in subscriptions {
            match sub.status {
                SubscriptionStatus::Authorized => kpis.active += 1,
                SubscriptionStatus::Paused => kpis.paused += 1,
                SubscriptionStatus::Cancelled => kpis.cancelled += 1,
                SubscriptionStatus::Pending => kpis.pending += 1,
            }
            if sub.status.is_billable() {
                let value = sub.monthly_value();
                kpis.mrr += value;
                if sub.created_at.is_before(&month_start) {
                    kpis.previous_mrr += value;
                }
            }
        }

        kpis.growth = growth_percent(kpis.previous_mrr, kpis.mrr);
        kpis
    }

    pub fn total(&self) -> u64 {
        self.active + self.paused + self.cancelled + self.pending
    }
}

fn growth_percent(baseline: Money, current: Money) -> f64 {
    if baseline.cents() <= 0 {
        return 0.0;
    }
    let pct = (current.cents() - baseline.cents()) as f64 * 100.0 / baseline.cents() as f64;
    (pct * 10.0).round() / 10.0
}
