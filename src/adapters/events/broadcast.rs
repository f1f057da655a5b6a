//! In-process broadcast bus feeding the live WebSocket endpoint.
//!
//! One `tokio::sync::broadcast` channel carries every tenant's events; each
//! subscriber stream filters down to its own tenant. A subscriber that falls
//! more than `capacity` events behind skips the missed ones and carries on.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::broadcast;

use crate::domain::foundation::{DomainError, EventEnvelope, UserId};
use crate::ports::{ChangeFeed, EventPublisher};

pub const DEFAULT_CAPACITY: usize = 256;

pub struct BroadcastEventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl BroadcastEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Number of live subscriber streams.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        // No receivers is not an error: nobody is watching right now.
        if self.sender.send(event).is_err() {
            tracing::trace!("change event dropped, no live subscribers");
        }
        Ok(())
    }
}

impl ChangeFeed for BroadcastEventBus {
    fn subscribe(&self, user_id: &UserId) -> BoxStream<'static, EventEnvelope> {
        let receiver = self.sender.subscribe();
        let user_id = user_id.clone();

        stream::unfold((receiver, user_id), |(mut receiver, user_id)| async move {
            loop {
                match receiver.recv().await {
                    Ok(event) if event.is_visible_to(&user_id) => {
                        return Some((event, (receiver, user_id)));
                    }
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(user_id = %user_id, skipped, "live feed lagged, events skipped");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
        .boxed()
    }
}
