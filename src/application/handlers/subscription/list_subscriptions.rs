//! ListSubscriptionsHandler - Query handler for the subscription table.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::subscription::{SubscriptionQuery, SubscriptionView};
use crate::ports::SubscriptionRepository;

#[derive(Debug, Clone)]
pub struct ListSubscriptionsQuery {
    pub user_id: UserId,
    pub filter: SubscriptionQuery,
}

pub struct ListSubscriptionsHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl ListSubscriptionsHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: ListSubscriptionsQuery,
    ) -> Result<Vec<SubscriptionView>, DomainError> {
        self.repository.list(&query.user_id, &query.filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::subscription::test_support::open;
    use crate::application::handlers::test_support::{uid, Fixture};
    use crate::domain::customer::LedgerChange;
    use crate::domain::subscription::{BillingCycle, StatusFilter, SubscriptionStatus};

    #[tokio::test]
    async fn filters_by_status_and_search() {
        let fx = Fixture::new();
        let (_, first) = open(&fx, "alice", 1_000, BillingCycle::Monthly).await;
        let (_, mut second) = open(&fx, "alice", 2_000, BillingCycle::Monthly).await;
        open(&fx, "bob", 3_000, BillingCycle::Monthly).await;

        let previous = second.clone();
        second.toggle_pause().unwrap();
        SubscriptionRepository::update(fx.store.as_ref(), &previous, &second, LedgerChange::NONE)
            .await
            .unwrap();

        let handler = ListSubscriptionsHandler::new(fx.store.clone());
        let query = |search: Option<&str>, status: StatusFilter| ListSubscriptionsQuery {
            user_id: uid("alice"),
            filter: SubscriptionQuery {
                search: search.map(str::to_string),
                status,
            },
        };

        let all = handler.handle(query(None, StatusFilter::All)).await.unwrap();
        assert_eq!(all.len(), 2);

        let paused = handler
            .handle(query(None, StatusFilter::Only(SubscriptionStatus::Paused)))
            .await
            .unwrap();
        assert_eq!(paused.len(), 1);
        assert_eq!(paused[0].subscription.id, second.id);

        let authorized = handler
            .handle(query(
                Some("CUSTOMER"),
                StatusFilter::Only(SubscriptionStatus::Authorized),
            ))
            .await
            .unwrap();
        assert_eq!(authorized.len(), 1);
        assert_eq!(authorized[0].subscription.id, first.id);

        let none = handler
            .handle(query(Some("zzz"), StatusFilter::All))
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
