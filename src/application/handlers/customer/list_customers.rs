//! ListCustomersHandler - Query handler for the customer list.

use std::sync::Arc;

use crate::domain::customer::Customer;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::CustomerRepository;

#[derive(Debug, Clone)]
pub struct ListCustomersQuery {
    pub user_id: UserId,
    /// Case-insensitive match on name or email.
    pub search: Option<String>,
}

pub struct ListCustomersHandler {
    repository: Arc<dyn CustomerRepository>,
}

impl ListCustomersHandler {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    /// Newest first.
    pub async fn handle(&self, query: ListCustomersQuery) -> Result<Vec<Customer>, DomainError> {
        self.repository
            .list(&query.user_id, query.search.as_deref())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{uid, Fixture};

    #[tokio::test]
    async fn lists_only_own_customers_filtered_by_search() {
        let fx = Fixture::new();
        fx.customer("alice", "Ana Gómez").await;
        fx.customer("alice", "Bruno Díaz").await;
        fx.customer("bob", "Ana Other").await;
        let handler = ListCustomersHandler::new(fx.store.clone());

        let all = handler
            .handle(ListCustomersQuery {
                user_id: uid("alice"),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let found = handler
            .handle(ListCustomersQuery {
                user_id: uid("alice"),
                search: Some("ANA".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name.as_str(), "Ana Gómez");
    }
}
