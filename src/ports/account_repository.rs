//! Account repository port.

use async_trait::async_trait;

use crate::domain::account::Account;
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find(&self, user_id: &UserId) -> Result<Option<Account>, DomainError>;

    /// Insert a freshly provisioned account.
    ///
    /// If another request created the account first, the stored one wins and
    /// is returned unchanged.
    async fn create(&self, account: &Account) -> Result<Account, DomainError>;

    /// Overwrite the mutable fields of an existing account.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account exists for the user
    async fn update(&self, account: &Account) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn AccountRepository) {}
    }
}
