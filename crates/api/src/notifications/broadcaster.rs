//! Event-to-WebSocket fan-out.

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::broadcast;
use viewcat_events::ChangeEvent;

use crate::ws::WsManager;

/// Forwards [`ChangeEvent`]s to every WebSocket subscribed to their team.
///
/// Delivery is at-most-once: a lagging receiver skips events, and a closed
/// socket simply does not count as a recipient.
pub struct ChangeBroadcaster {
    ws_manager: Arc<WsManager>,
}

impl ChangeBroadcaster {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the main delivery loop.
    ///
    /// Exits when the channel is closed (i.e. the
    /// [`EventBus`](viewcat_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<ChangeEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.deliver(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Change broadcaster lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, change broadcaster shutting down");
                    break;
                }
            }
        }
    }

    /// Serialize one event and queue it for the team's connections.
    ///
    /// Returns the number of connections it was queued for.
    pub async fn deliver(&self, event: &ChangeEvent) -> usize {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, action = event.action(), "Failed to serialize change event");
                return 0;
            }
        };

        let count = self
            .ws_manager
            .broadcast_to_team(&event.team_id, Message::Text(json.into()))
            .await;
        tracing::debug!(
            team_id = %event.team_id,
            action = event.action(),
            recipients = count,
            "Delivered change event",
        );
        count
    }
}
