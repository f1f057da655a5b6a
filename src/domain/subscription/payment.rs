//! Payment records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ErrorCode, Money, OwnedByUser, PaymentId, SubscriptionId, Timestamp, UserId,
};

/// A manually recorded payment against a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,

    pub subscription_id: SubscriptionId,

    pub user_id: UserId,

    /// When the payment was recorded.
    pub paid_at: Timestamp,

    /// Subscription price at the time of payment.
    pub amount: Money,

    /// The due date this payment settled.
    pub covered_until: Timestamp,
}

impl OwnedByUser for Payment {
    fn owner_id(&self) -> &UserId {
        &self.user_id
    }

    fn not_found_code() -> ErrorCode {
        ErrorCode::SubscriptionNotFound
    }
}
