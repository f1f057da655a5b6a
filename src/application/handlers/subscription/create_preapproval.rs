//! CreatePreapprovalHandler - asks the payment provider for an authorization
//! link the customer can use to approve recurring charges.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, UserId};
use crate::domain::subscription::SubscriptionStatus;
use crate::ports::{Preapproval, PreapprovalProvider, PreapprovalRequest, SubscriptionRepository};

use super::subscription_not_found;

#[derive(Debug, Clone)]
pub struct CreatePreapprovalCommand {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
}

pub struct CreatePreapprovalHandler {
    repository: Arc<dyn SubscriptionRepository>,
    provider: Arc<dyn PreapprovalProvider>,
}

impl CreatePreapprovalHandler {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        provider: Arc<dyn PreapprovalProvider>,
    ) -> Self {
        Self {
            repository,
            provider,
        }
    }

    pub async fn handle(&self, cmd: CreatePreapprovalCommand) -> Result<Preapproval, DomainError> {
        let view = self
            .repository
            .find_view(&cmd.user_id, &cmd.subscription_id)
            .await?
            .ok_or_else(|| subscription_not_found(&cmd.subscription_id))?;

        if view.subscription.status == SubscriptionStatus::Cancelled {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Cannot request authorization for a cancelled subscription",
            ));
        }

        let request = PreapprovalRequest {
            subscription_id: view.subscription.id,
            payer_email: view.customer_email,
            reason: view.subscription.plan,
            amount: view.subscription.price,
            billing_cycle: view.subscription.billing_cycle,
        };

        let preapproval = self.provider.create_preapproval(request).await.map_err(|e| {
            tracing::warn!(subscription_id = %cmd.subscription_id, error = %e, "pre-approval failed");
            DomainError::from(e)
        })?;

        tracing::info!(
            user_id = %cmd.user_id,
            subscription_id = %cmd.subscription_id,
            preapproval_id = %preapproval.preapproval_id,
            "pre-approval created"
        );
        Ok(preapproval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::preapproval::StubPreapprovalProvider;
    use crate::application::handlers::subscription::test_support::open;
    use crate::application::handlers::test_support::{uid, Fixture};
    use crate::domain::subscription::BillingCycle;

    #[tokio::test]
    async fn sends_customer_and_price_to_provider() {
        let fx = Fixture::new();
        let (customer, sub) = open(&fx, "alice", 4_999, BillingCycle::Monthly).await;
        let provider = Arc::new(StubPreapprovalProvider::new("https://pay.example.com"));
        let handler = CreatePreapprovalHandler::new(fx.store.clone(), provider.clone());

        let preapproval = handler
            .handle(CreatePreapprovalCommand {
                user_id: uid("alice"),
                subscription_id: sub.id,
            })
            .await
            .unwrap();

        assert!(preapproval
            .authorization_url
            .ends_with(&preapproval.preapproval_id));
        let issued = provider.issued();
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].payer_email, customer.email.as_str());
        assert_eq!(issued[0].amount, sub.price);
    }

    #[tokio::test]
    async fn provider_rejection_maps_to_payment_provider_error() {
        let fx = Fixture::new();
        let (_, sub) = open(&fx, "alice", 0, BillingCycle::Monthly).await;
        let handler = CreatePreapprovalHandler::new(
            fx.store.clone(),
            Arc::new(StubPreapprovalProvider::new("https://pay.example.com")),
        );

        let err = handler
            .handle(CreatePreapprovalCommand {
                user_id: uid("alice"),
                subscription_id: sub.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentProviderError);
    }
}
