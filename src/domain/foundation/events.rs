//! Change events.
//!
//! Every successful write emits one `EventEnvelope`. Envelopes are scoped to
//! the tenant that made the change and carry the changed record as JSON so
//! that live clients can patch their lists without a refetch.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{EventId, Timestamp, UserId};

/// Aggregate kinds that emit change events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKind {
    Customer,
    Subscription,
    Account,
}

impl AggregateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateKind::Customer => "customer",
            AggregateKind::Subscription => "subscription",
            AggregateKind::Account => "account",
        }
    }
}

/// Transport-neutral wrapper around a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,

    /// Dotted type, e.g. `subscription.payment_recorded`.
    pub event_type: String,

    pub aggregate_id: String,

    pub aggregate_kind: AggregateKind,

    /// Tenant whose data changed. Only that tenant's live feed sees it.
    pub user_id: UserId,

    pub occurred_at: Timestamp,

    pub payload: JsonValue,
}

impl EventEnvelope {
    pub fn new(
        user_id: UserId,
        aggregate_kind: AggregateKind,
        action: &str,
        aggregate_id: impl ToString,
        payload: JsonValue,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            event_type: format!("{}.{}", aggregate_kind.as_str(), action),
            aggregate_id: aggregate_id.to_string(),
            aggregate_kind,
            user_id,
            occurred_at: Timestamp::now(),
            payload,
        }
    }

    /// Serializes `record` as the payload; falls back to `null` if it cannot
    /// be represented as JSON.
    pub fn for_record<T: Serialize>(
        user_id: UserId,
        aggregate_kind: AggregateKind,
        action: &str,
        aggregate_id: impl ToString,
        record: &T,
    ) -> Self {
        let payload = serde_json::to_value(record).unwrap_or(JsonValue::Null);
        Self::new(user_id, aggregate_kind, action, aggregate_id, payload)
    }

    pub fn is_visible_to(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}
