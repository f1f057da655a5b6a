//! GetKpisHandler - status counts, MRR and month-over-month growth.

use std::sync::Arc;

use crate::domain::dashboard::DashboardKpis;
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::ports::SubscriptionRepository;

#[derive(Debug, Clone)]
pub struct GetKpisQuery {
    pub user_id: UserId,
}

pub struct GetKpisHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl GetKpisHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetKpisQuery) -> Result<DashboardKpis, DomainError> {
        let subscriptions = self.repository.list_all(&query.user_id).await?;
        Ok(DashboardKpis::compute(&subscriptions, Timestamp::now()))
    }
}
