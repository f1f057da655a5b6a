//! Read model for subscription lists and detail views.

use serde::{Deserialize, Serialize};

use crate::domain::customer::{matches_contact, Customer};
use crate::domain::foundation::Money;

use super::{StatusFilter, Subscription};

/// A subscription joined with its customer's contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub subscription: Subscription,

    pub customer_name: String,

    pub customer_email: String,

    pub monthly_value: Money,
}

impl SubscriptionView {
    pub fn new(subscription: Subscription, customer: &Customer) -> Self {
        Self::from_parts(
            subscription,
            customer.name.as_str().to_string(),
            customer.email.as_str().to_string(),
        )
    }

    pub fn from_parts(subscription: Subscription, customer_name: String, customer_email: String) -> Self {
        let monthly_value = subscription.monthly_value();
        Self {
            subscription,
            customer_name,
            customer_email,
            monthly_value,
        }
    }
}

/// Search text plus status filter for subscription lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionQuery {
    /// Matched case-insensitively against customer name or email.
    pub search: Option<String>,
    pub status: StatusFilter,
}

impl SubscriptionQuery {
    pub fn matches(&self, view: &SubscriptionView) -> bool {
        self.status.matches(view.subscription.status)
            && matches_contact(
                &view.customer_name,
                &view.customer_email,
                self.search.as_deref().unwrap_or(""),
            )
    }

    /// Filters and orders newest first.
    pub fn apply(&self, views: impl IntoIterator<Item = SubscriptionView>) -> Vec<SubscriptionView> {
        let mut out: Vec<_> = views.into_iter().filter(|v| self.matches(v)).collect();
        out.sort_by(|a, b| b.subscription.created_at.cmp(&a.subscription.created_at));
        out
    }
}
