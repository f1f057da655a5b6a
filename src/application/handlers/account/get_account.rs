//! GetAccountHandler - the caller's account and trial state.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::AccountRepository;

use super::AccountSummary;

#[derive(Debug, Clone)]
pub struct GetAccountQuery {
    pub user_id: UserId,
}

pub struct GetAccountHandler {
    repository: Arc<dyn AccountRepository>,
}

impl GetAccountHandler {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetAccountQuery) -> Result<AccountSummary, DomainError> {
        let account = self
            .repository
            .find(&query.user_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::AccountNotFound,
                    "Account not provisioned yet, sign in first",
                )
            })?;

        Ok(AccountSummary::at(account, &Timestamp::now()))
    }
}
