//! HTTP DTOs for dashboard endpoints.

use serde::Serialize;

use crate::domain::dashboard::DashboardKpis;
use crate::domain::foundation::Money;

#[derive(Debug, Clone, Serialize)]
pub struct KpisResponse {
    pub active: u64,
    pub paused: u64,
    pub cancelled: u64,
    pub pending: u64,
    pub total: u64,
    pub mrr: Money,
    pub previous_mrr: Money,
    /// Percent, one decimal.
    pub growth: f64,
}

impl From<DashboardKpis> for KpisResponse {
    fn from(kpis: DashboardKpis) -> Self {
        Self {
            total: kpis.total(),
            active: kpis.active,
            paused: kpis.paused,
            cancelled: kpis.cancelled,
            pending: kpis.pending,
            mrr: kpis.mrr,
            previous_mrr: kpis.previous_mrr,
            growth: kpis.growth,
        }
    }
}
