//! Pre-approval port.
//!
//! A pre-approval is the customer's consent, given on the payment provider's
//! site, to be charged on every cycle. The provider hands back a URL the
//! customer must visit.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, Money, SubscriptionId};
use crate::domain::subscription::BillingCycle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreapprovalRequest {
    pub subscription_id: SubscriptionId,
    pub payer_email: String,
    pub reason: String,
    pub amount: Money,
    pub billing_cycle: BillingCycle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preapproval {
    pub authorization_url: String,
    pub preapproval_id: String,
}

#[derive(Debug, Clone, Error)]
pub enum PreapprovalError {
    #[error("Payment provider rejected the request: {0}")]
    Rejected(String),

    #[error("Payment provider unavailable: {0}")]
    Unavailable(String),
}

impl From<PreapprovalError> for DomainError {
    fn from(err: PreapprovalError) -> Self {
        DomainError::new(ErrorCode::PaymentProviderError, err.to_string())
    }
}

#[async_trait]
pub trait PreapprovalProvider: Send + Sync {
    async fn create_preapproval(
        &self,
        request: PreapprovalRequest,
    ) -> Result<Preapproval, PreapprovalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_to_payment_provider_code() {
        let err: DomainError = PreapprovalError::Unavailable("timeout".to_string()).into();
        assert_eq!(err.code, ErrorCode::PaymentProviderError);
    }
}
