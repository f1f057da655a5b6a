//! Stub pre-approval provider.
//!
//! No payment provider is integrated. The stub mints a pre-approval id and
//! points the payer at a configurable checkout URL, which is enough for the
//! client flow to be exercised end to end.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::ports::{Preapproval, PreapprovalError, PreapprovalProvider, PreapprovalRequest};

#[derive(Debug)]
pub struct StubPreapprovalProvider {
    base_url: String,
    issued: Mutex<Vec<PreapprovalRequest>>,
}

impl StubPreapprovalProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            issued: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, oldest first.
    pub fn issued(&self) -> Vec<PreapprovalRequest> {
        self.issued
            .lock()
            .map(|issued| issued.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PreapprovalProvider for StubPreapprovalProvider {
    async fn create_preapproval(
        &self,
        request: PreapprovalRequest,
    ) -> Result<Preapproval, PreapprovalError> {
        if request.amount.is_zero() {
            return Err(PreapprovalError::Rejected(
                "amount must be greater than zero".to_string(),
            ));
        }

        let preapproval_id = format!("pre_{}", Uuid::new_v4().simple());
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        let authorization_url = format!(
            "{}{}preapproval_id={}",
            self.base_url, separator, preapproval_id
        );

        tracing::info!(
            subscription_id = %request.subscription_id,
            preapproval_id = %preapproval_id,
            amount = %request.amount,
            cycle = %request.billing_cycle,
            "stub pre-approval issued"
        );

        self.issued
            .lock()
            .map_err(|_| PreapprovalError::Unavailable("stub state poisoned".to_string()))?
            .push(request);

        Ok(Preapproval {
            authorization_url,
            preapproval_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Money, SubscriptionId};
    use crate::domain::subscription::BillingCycle;

    fn request(cents: i64) -> PreapprovalRequest {
        PreapprovalRequest {
            subscription_id: SubscriptionId::new(),
            payer_email: "ana@example.com".to_string(),
            reason: "Pro".to_string(),
            amount: Money::from_cents(cents),
            billing_cycle: BillingCycle::Monthly,
        }
    }

    #[tokio::test]
    async fn builds_url_from_base() {
        let stub = StubPreapprovalProvider::new("https://pay.example.com/authorize");
        let result = stub.create_preapproval(request(4_999)).await.unwrap();

        assert!(result.preapproval_id.starts_with("pre_"));
        assert_eq!(
            result.authorization_url,
            format!(
                "https://pay.example.com/authorize?preapproval_id={}",
                result.preapproval_id
            )
        );
        assert_eq!(stub.issued().len(), 1);
    }

    #[tokio::test]
    async fn appends_to_existing_query() {
        let stub = StubPreapprovalProvider::new("https://pay.example.com/a?site=ar");
        let result = stub.create_preapproval(request(100)).await.unwrap();
        assert!(result.authorization_url.contains("?site=ar&preapproval_id=pre_"));
    }

    #[tokio::test]
    async fn free_plans_are_rejected() {
        let stub = StubPreapprovalProvider::new("https://pay.example.com");
        let result = stub.create_preapproval(request(0)).await;
        assert!(matches!(result, Err(PreapprovalError::Rejected(_))));
        assert!(stub.issued().is_empty());
    }
}
