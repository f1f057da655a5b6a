//! ChangeFeed port - live stream of one tenant's change events.

use futures::stream::BoxStream;

use crate::domain::foundation::{EventEnvelope, UserId};

/// Source of live change events, filtered per tenant.
///
/// The stream ends when the feed shuts down. Events a slow consumer could
/// not keep up with are skipped rather than buffered without bound.
pub trait ChangeFeed: Send + Sync {
    fn subscribe(&self, user_id: &UserId) -> BoxStream<'static, EventEnvelope>;
}
