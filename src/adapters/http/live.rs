//! Live change feed over WebSocket.
//!
//! `GET /api/live` upgrades to a WebSocket that pushes every change event of
//! the authenticated tenant as a JSON text frame. Clients only listen;
//! anything they send except a close frame is ignored.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::domain::foundation::{EventEnvelope, UserId};

/// GET /api/live
pub async fn live_feed(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Response {
    // Subscribe before the upgrade so no event published in between is lost.
    let events = state.change_feed.subscribe(&user.id);
    ws.on_upgrade(move |socket| forward_events(socket, user.id, events))
}

async fn forward_events(
    socket: WebSocket,
    user_id: UserId,
    mut events: futures::stream::BoxStream<'static, EventEnvelope>,
) {
    let (mut sender, mut receiver) = socket.split();
    tracing::debug!(user_id = %user_id, "live feed connected");

    loop {
        tokio::select! {
            event = events.next() => {
                let Some(event) = event else { break };
                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(event_type = %event.event_type, error = %e, "unserializable change event");
                        continue;
                    }
                };
                if let Err(e) = sender.send(Message::Text(text)).await {
                    tracing::debug!(user_id = %user_id, "send error, closing live feed: {}", e);
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(user_id = %user_id, "receive error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    tracing::debug!(user_id = %user_id, "live feed disconnected");
}
