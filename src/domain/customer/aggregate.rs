//! Customer aggregate.
//!
//! # Design Decisions
//!
//! - **Denormalized counters**: `subscriptions` and `total_value` are kept on
//!   the customer so list views never aggregate on read
//! - **Ledger-driven updates**: counters only change through `apply`, fed by a
//!   `LedgerChange` computed on the subscription side
//! - **Money in cents**: `total_value` is a `Money`, never a float

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CustomerId, DomainError, ErrorCode, Money, OwnedByUser, Timestamp, UserId,
};

use super::{CustomerName, EmailAddress, LedgerChange};

/// A person or business that is billed through one or more subscriptions.
///
/// # Invariants
///
/// - `subscriptions` equals the number of subscriptions referencing this customer
/// - `total_value` equals the sum of their monthly-equivalent prices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,

    /// Tenant that owns this customer.
    pub user_id: UserId,

    pub name: CustomerName,

    pub email: EmailAddress,

    /// Number of subscriptions referencing this customer.
    pub subscriptions: i64,

    /// Monthly-equivalent revenue across those subscriptions.
    pub total_value: Money,

    pub created_at: Timestamp,
}

impl Customer {
    /// Creates a customer with zeroed counters.
    pub fn create(user_id: UserId, name: &str, email: &str) -> Result<Self, DomainError> {
        Ok(Self {
            id: CustomerId::new(),
            user_id,
            name: CustomerName::parse(name)?,
            email: EmailAddress::parse(email)?,
            subscriptions: 0,
            total_value: Money::ZERO,
            created_at: Timestamp::now(),
        })
    }

    /// Applies a counter change produced by a subscription write.
    pub fn apply(&mut self, change: LedgerChange) {
        self.subscriptions += change.subscriptions;
        self.total_value += change.total_value;
    }

    /// A customer can only be removed once nothing bills against it.
    pub fn ensure_deletable(&self) -> Result<(), DomainError> {
        if self.subscriptions > 0 {
            return Err(DomainError::new(
                ErrorCode::CustomerHasSubscriptions,
                format!(
                    "Customer {} still has {} subscription(s)",
                    self.name, self.subscriptions
                ),
            )
            .with_detail("subscriptions", self.subscriptions.to_string()));
        }
        Ok(())
    }

    /// Case-insensitive substring match on name or email.
    ///
    /// An empty needle matches everything.
    pub fn matches_search(&self, needle: &str) -> bool {
        matches_contact(self.name.as_str(), self.email.as_str(), needle)
    }
}

impl OwnedByUser for Customer {
    fn owner_id(&self) -> &UserId {
        &self.user_id
    }

    fn not_found_code() -> ErrorCode {
        ErrorCode::CustomerNotFound
    }
}

/// Shared search predicate for anything listed by customer contact details.
pub fn matches_contact(name: &str, email: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&needle) || email.to_lowercase().contains(&needle)
}
