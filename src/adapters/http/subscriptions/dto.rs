//! HTTP DTOs for subscription endpoints.
//!
//! Amounts travel as decimal numbers and are converted to cents here, at
//! the boundary.

use serde::{Deserialize, Serialize};

use crate::application::handlers::subscription::{CustomerRef, RecordPaymentResult};
use crate::domain::foundation::{DomainError, Money, Timestamp};
use crate::domain::subscription::{
    BillingCycle, Payment, StatusFilter, Subscription, SubscriptionChanges, SubscriptionQuery,
    SubscriptionStatus, SubscriptionView,
};

use crate::adapters::http::error::customer_id;
use crate::adapters::http::error::ApiError;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomerRequest {
    pub name: String,
    pub email: String,
}

/// Either `customer_id` or `new_customer` must be given, not both.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub customer_id: Option<String>,
    pub new_customer: Option<NewCustomerRequest>,
    pub plan: String,
    pub price: f64,
    #[serde(default)]
    pub billing_cycle: BillingCycle,
    pub next_payment: Option<Timestamp>,
}

impl CreateSubscriptionRequest {
    pub fn customer_ref(&self) -> Result<CustomerRef, ApiError> {
        match (&self.customer_id, &self.new_customer) {
            (Some(id), None) => Ok(CustomerRef::Existing(customer_id(id)?)),
            (None, Some(new)) => Ok(CustomerRef::New {
                name: new.name.clone(),
                email: new.email.clone(),
            }),
            _ => Err(DomainError::validation(
                "customer",
                "provide exactly one of customer_id or new_customer",
            )
            .into()),
        }
    }

    pub fn price(&self) -> Result<Money, ApiError> {
        Ok(Money::price(self.price)?)
    }
}

/// Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub plan: Option<String>,
    pub price: Option<f64>,
    pub billing_cycle: Option<BillingCycle>,
    pub next_payment: Option<Timestamp>,
}

impl UpdateSubscriptionRequest {
    pub fn into_changes(self) -> Result<SubscriptionChanges, ApiError> {
        let price = self.price.map(Money::price).transpose()?;
        Ok(SubscriptionChanges {
            plan: self.plan,
            price,
            billing_cycle: self.billing_cycle,
            next_payment: self.next_payment,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSubscriptionsParams {
    pub search: Option<String>,
    /// `all` or a status name; absent means all.
    pub status: Option<String>,
}

impl ListSubscriptionsParams {
    pub fn into_query(self) -> Result<SubscriptionQuery, ApiError> {
        let status = match self.status.as_deref() {
            Some(raw) => raw.parse::<StatusFilter>()?,
            None => StatusFilter::All,
        };
        Ok(SubscriptionQuery {
            search: self.search,
            status,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePreapprovalRequest {
    pub subscription_id: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A subscription joined with its customer's contact details.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub plan: String,
    pub price: Money,
    pub billing_cycle: BillingCycle,
    pub status: SubscriptionStatus,
    pub monthly_value: Money,
    pub last_payment: Option<Timestamp>,
    pub next_payment: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<SubscriptionView> for SubscriptionResponse {
    fn from(view: SubscriptionView) -> Self {
        let sub = view.subscription;
        Self {
            id: sub.id.to_string(),
            customer_id: sub.customer_id.to_string(),
            customer_name: view.customer_name,
            customer_email: view.customer_email,
            plan: sub.plan,
            price: sub.price,
            billing_cycle: sub.billing_cycle,
            status: sub.status,
            monthly_value: view.monthly_value,
            last_payment: sub.last_payment,
            next_payment: sub.next_payment,
            created_at: sub.created_at,
        }
    }
}

/// State after a lifecycle action (pause, cancel, payment).
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionStateResponse {
    pub id: String,
    pub status: SubscriptionStatus,
    pub last_payment: Option<Timestamp>,
    pub next_payment: Option<Timestamp>,
}

impl From<Subscription> for SubscriptionStateResponse {
    fn from(sub: Subscription) -> Self {
        Self {
            id: sub.id.to_string(),
            status: sub.status,
            last_payment: sub.last_payment,
            next_payment: sub.next_payment,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub subscription_id: String,
    pub paid_at: Timestamp,
    pub amount: Money,
    /// Due date this payment settled.
    pub covered_until: Timestamp,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            subscription_id: payment.subscription_id.to_string(),
            paid_at: payment.paid_at,
            amount: payment.amount,
            covered_until: payment.covered_until,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordPaymentResponse {
    pub subscription: SubscriptionStateResponse,
    pub payment: PaymentResponse,
}

impl From<RecordPaymentResult> for RecordPaymentResponse {
    fn from(result: RecordPaymentResult) -> Self {
        Self {
            subscription: result.subscription.into(),
            payment: result.payment.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CustomerId, ErrorCode};

    fn create_request(json: serde_json::Value) -> CreateSubscriptionRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn create_request_defaults_to_monthly() {
        let request = create_request(serde_json::json!({
            "new_customer": {"name": "ana", "email": "ana@example.com"},
            "plan": "Pro",
            "price": 49.99
        }));
        assert_eq!(request.billing_cycle, BillingCycle::Monthly);
        assert_eq!(request.price().unwrap().cents(), 4999);
        assert!(matches!(request.customer_ref().unwrap(), CustomerRef::New { .. }));
    }

    #[test]
    fn create_request_needs_exactly_one_customer() {
        let id = CustomerId::new().to_string();
        let both = create_request(serde_json::json!({
            "customer_id": id,
            "new_customer": {"name": "ana", "email": "ana@example.com"},
            "plan": "Pro",
            "price": 10.0
        }));
        assert_eq!(both.customer_ref().unwrap_err().code(), ErrorCode::ValidationFailed);

        let neither = create_request(serde_json::json!({"plan": "Pro", "price": 10.0}));
        assert!(neither.customer_ref().is_err());

        let existing = create_request(serde_json::json!({
            "customer_id": id, "plan": "Pro", "price": 10.0, "billing_cycle": "yearly"
        }));
        assert!(matches!(existing.customer_ref().unwrap(), CustomerRef::Existing(_)));
        assert_eq!(existing.billing_cycle, BillingCycle::Yearly);
    }

    #[test]
    fn negative_price_is_rejected() {
        let request = create_request(serde_json::json!({
            "new_customer": {"name": "ana", "email": "ana@example.com"},
            "plan": "Pro",
            "price": -1.0
        }));
        assert_eq!(request.price().unwrap_err().code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn update_request_keeps_absent_fields_empty() {
        let request: UpdateSubscriptionRequest =
            serde_json::from_value(serde_json::json!({"price": 12.5})).unwrap();
        let changes = request.into_changes().unwrap();
        assert_eq!(changes.price, Some(Money::from_cents(1250)));
        assert!(changes.plan.is_none());
        assert!(changes.billing_cycle.is_none());
    }

    #[test]
    fn list_params_parse_status_filter() {
        let params = ListSubscriptionsParams {
            search: Some("ana".into()),
            status: Some("paused".into()),
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.status, StatusFilter::Only(SubscriptionStatus::Paused));

        let bad = ListSubscriptionsParams {
            search: None,
            status: Some("frozen".into()),
        };
        assert!(bad.into_query().is_err());
        assert_eq!(
            ListSubscriptionsParams::default().into_query().unwrap().status,
            StatusFilter::All
        );
    }
}
