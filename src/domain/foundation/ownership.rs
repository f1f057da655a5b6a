//! Tenant ownership for user-owned records.
//!
//! Every customer, subscription and payment belongs to exactly one user.
//! A record owned by someone else is reported as missing, never as
//! forbidden, so tenants cannot probe each other's ids.

use super::{DomainError, ErrorCode, UserId};

/// Trait for records that have a single owning tenant.
pub trait OwnedByUser {
    /// Returns the ID of the user who owns this record.
    fn owner_id(&self) -> &UserId;

    /// Error code reported when the record is not visible to a caller.
    fn not_found_code() -> ErrorCode;

    /// Checks if the given user is the owner.
    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }

    /// Fails with the record's not-found error unless `user_id` owns it.
    fn check_ownership(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            tracing::debug!(
                owner_id = %self.owner_id(),
                requested_by = %user_id,
                "cross-tenant access reported as not found"
            );
            Err(DomainError::new(Self::not_found_code(), "Resource not found"))
        }
    }
}
