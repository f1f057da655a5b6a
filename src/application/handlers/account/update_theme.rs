//! UpdateThemeHandler - stores the caller's light/dark/system choice.

use std::sync::Arc;

use crate::application::handlers::announce;
use crate::domain::account::{Account, ThemePreference};
use crate::domain::foundation::{AggregateKind, DomainError, ErrorCode, EventEnvelope, UserId};
use crate::ports::{AccountRepository, EventPublisher};

#[derive(Debug, Clone)]
pub struct UpdateThemeCommand {
    pub user_id: UserId,
    pub theme: ThemePreference,
}

pub struct UpdateThemeHandler {
    repository: Arc<dyn AccountRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateThemeHandler {
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: UpdateThemeCommand) -> Result<Account, DomainError> {
        let mut account = self
            .repository
            .find(&cmd.user_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::AccountNotFound, "Account not provisioned yet")
            })?;

        account.set_theme(cmd.theme);
        self.repository.update(&account).await?;

        tracing::debug!(user_id = %cmd.user_id, theme = %cmd.theme, "theme updated");

        announce(
            self.event_publisher.as_ref(),
            EventEnvelope::for_record(
                cmd.user_id.clone(),
                AggregateKind::Account,
                "theme_changed",
                &cmd.user_id,
                &account,
            ),
        )
        .await;

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::uid;
    use crate::domain::foundation::{AuthenticatedUser, Timestamp};

    #[tokio::test]
    async fn theme_is_persisted() {
        let store = Arc::new(InMemoryStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let user = AuthenticatedUser::new(uid("alice"), "ana@example.com", None, true);
        AccountRepository::create(store.as_ref(), &Account::provision(&user, 15, Timestamp::now()))
            .await
            .unwrap();

        let account = UpdateThemeHandler::new(store.clone(), bus.clone())
            .handle(UpdateThemeCommand {
                user_id: uid("alice"),
                theme: ThemePreference::Dark,
            })
            .await
            .unwrap();

        assert_eq!(account.theme, Some(ThemePreference::Dark));
        let stored = AccountRepository::find(store.as_ref(), &uid("alice"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.theme, Some(ThemePreference::Dark));
        assert!(bus.has_event("account.theme_changed"));
    }

    #[tokio::test]
    async fn requires_provisioned_account() {
        let err = UpdateThemeHandler::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(InMemoryEventBus::new()),
        )
        .handle(UpdateThemeCommand {
            user_id: uid("ghost"),
            theme: ThemePreference::Light,
        })
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountNotFound);
    }
}
