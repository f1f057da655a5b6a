//! ProvisionAccountHandler - called after every sign-in or sign-up.
//!
//! The first call creates a trial account; later calls refresh the login
//! time and the profile fields carried by the token.

use std::sync::Arc;

use crate::application::handlers::announce;
use crate::domain::account::Account;
use crate::domain::foundation::{
    AggregateKind, AuthenticatedUser, DomainError, EventEnvelope, Timestamp,
};
use crate::ports::{AccountRepository, EventPublisher};

use super::AccountSummary;

#[derive(Debug, Clone)]
pub struct ProvisionAccountCommand {
    pub user: AuthenticatedUser,
}

#[derive(Debug, Clone)]
pub struct ProvisionAccountResult {
    pub summary: AccountSummary,
    /// True when this call created the account.
    pub created: bool,
}

pub struct ProvisionAccountHandler {
    repository: Arc<dyn AccountRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    trial_days: u32,
}

impl ProvisionAccountHandler {
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        trial_days: u32,
    ) -> Self {
        Self {
            repository,
            event_publisher,
            trial_days,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProvisionAccountCommand,
    ) -> Result<ProvisionAccountResult, DomainError> {
        let now = Timestamp::now();
        let user = cmd.user;

        if let Some(mut account) = self.repository.find(&user.id).await? {
            account.record_login(&user, now);
            self.repository.update(&account).await?;
            tracing::debug!(user_id = %user.id, "account login recorded");
            return Ok(ProvisionAccountResult {
                summary: AccountSummary::at(account, &now),
                created: false,
            });
        }

        let fresh = Account::provision(&user, self.trial_days, now);
        let stored = self.repository.create(&fresh).await?;
        let created = stored == fresh;

        if created {
            tracing::info!(
                user_id = %user.id,
                federated = user.is_federated(),
                trial_days = self.trial_days,
                "account provisioned"
            );
            announce(
                self.event_publisher.as_ref(),
                EventEnvelope::for_record(
                    user.id.clone(),
                    AggregateKind::Account,
                    "provisioned",
                    &user.id,
                    &stored,
                ),
            )
            .await;
        }

        Ok(ProvisionAccountResult {
            summary: AccountSummary::at(stored, &now),
            created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::uid;
    use crate::domain::account::AccountStatus;

    fn user(email: &str, name: Option<&str>) -> AuthenticatedUser {
        AuthenticatedUser::new(uid("alice"), email, name.map(str::to_string), true)
    }

    fn handler(store: Arc<InMemoryStore>, bus: Arc<InMemoryEventBus>) -> ProvisionAccountHandler {
        ProvisionAccountHandler::new(store, bus, 15)
    }

    #[tokio::test]
    async fn first_sign_in_starts_trial() {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(InMemoryEventBus::new());

        let result = handler(store.clone(), bus.clone())
            .handle(ProvisionAccountCommand {
                user: user("ana@example.com", Some("Ana")),
            })
            .await
            .unwrap();

        assert!(result.created);
        let summary = result.summary;
        assert_eq!(summary.account.status, AccountStatus::Trial);
        assert_eq!(summary.trial_days_left, 15);
        assert!(summary.show_trial_banner);
        assert!(bus.has_event("account.provisioned"));
    }

    #[tokio::test]
    async fn later_sign_in_refreshes_profile_only() {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = handler(store.clone(), bus.clone());

        let first = handler
            .handle(ProvisionAccountCommand {
                user: user("ana@example.com", Some("Ana")),
            })
            .await
            .unwrap();
        let second = handler
            .handle(ProvisionAccountCommand {
                user: user("ana@new.example.com", None),
            })
            .await
            .unwrap();

        assert!(!second.created);
        let account = second.summary.account;
        assert_eq!(account.email, "ana@new.example.com");
        assert_eq!(account.display_name.as_deref(), Some("Ana"));
        assert_eq!(account.trial_ends_at, first.summary.account.trial_ends_at);
        assert_eq!(bus.events_of_type("account.provisioned").len(), 1);
    }
}
