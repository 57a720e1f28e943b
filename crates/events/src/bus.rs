//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`ChangeEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use viewcat_core::types::EntityId;
use viewcat_db::models::view_category::ViewCategory;

// ---------------------------------------------------------------------------
// Action names
// ---------------------------------------------------------------------------

pub const ACTION_UPDATE_VIEW_CATEGORY: &str = "UPDATE_VIEW_CATEGORY";
pub const ACTION_REORDER_VIEW_CATEGORIES: &str = "REORDER_VIEW_CATEGORIES";
pub const ACTION_UPDATE_VIEW_CATEGORY_VIEW: &str = "UPDATE_VIEW_CATEGORY_VIEW";
pub const ACTION_REORDER_VIEW_CATEGORY_VIEWS: &str = "REORDER_VIEW_CATEGORY_VIEWS";

// ---------------------------------------------------------------------------
// ChangeEvent
// ---------------------------------------------------------------------------

/// What changed. Serialized as `"action"` plus `"payload"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangePayload {
    /// A category was created, updated or tombstoned (`delete_at` set).
    UpdateViewCategory(ViewCategory),

    /// The category order of a board changed.
    ReorderViewCategories {
        board_id: EntityId,
        category_order: Vec<EntityId>,
    },

    /// A view's membership or hidden flag changed.
    UpdateViewCategoryView {
        category_id: EntityId,
        view_id: EntityId,
        hidden: bool,
    },

    /// The view order inside a category changed.
    ReorderViewCategoryViews {
        category_id: EntityId,
        view_order: Vec<EntityId>,
    },
}

impl ChangePayload {
    /// The wire action name.
    pub fn action(&self) -> &'static str {
        match self {
            ChangePayload::UpdateViewCategory(_) => ACTION_UPDATE_VIEW_CATEGORY,
            ChangePayload::ReorderViewCategories { .. } => ACTION_REORDER_VIEW_CATEGORIES,
            ChangePayload::UpdateViewCategoryView { .. } => ACTION_UPDATE_VIEW_CATEGORY_VIEW,
            ChangePayload::ReorderViewCategoryViews { .. } => ACTION_REORDER_VIEW_CATEGORY_VIEWS,
        }
    }
}

/// A categorization change addressed to every client of a team.
///
/// Serializes as `{ "action", "team_id", "payload", "timestamp" }`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    /// Team whose subscribers receive the event.
    pub team_id: EntityId,

    #[serde(flatten)]
    pub change: ChangePayload,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(team_id: impl Into<EntityId>, change: ChangePayload) -> Self {
        Self {
            team_id: team_id.into(),
            change,
            timestamp: Utc::now(),
        }
    }

    /// The wire action name.
    pub fn action(&self) -> &'static str {
        self.change.action()
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`ChangeEvent`].
///
/// # Usage
///
/// ```rust
/// use viewcat_events::bus::{ChangeEvent, ChangePayload, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ChangeEvent::new(
///     "team-1",
///     ChangePayload::ReorderViewCategories {
///         board_id: "board-1".into(),
///         category_order: vec![],
///     },
/// ));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Never blocks. If there are no active subscribers the event is
    /// silently dropped.
    pub fn publish(&self, event: ChangeEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn reorder_event(team_id: &str) -> ChangeEvent {
        ChangeEvent::new(
            team_id,
            ChangePayload::ReorderViewCategories {
                board_id: "b1".into(),
                category_order: vec!["c2".into(), "c1".into()],
            },
        )
    }

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(reorder_event("t1"));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.team_id, "t1");
        assert_eq!(received.action(), ACTION_REORDER_VIEW_CATEGORIES);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(reorder_event("t1"));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert_eq!(e1.change, e2.change);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(reorder_event("orphan"));
    }

    #[test]
    fn reorder_event_wire_shape() {
        let json = serde_json::to_value(reorder_event("t1")).unwrap();

        assert_eq!(json["action"], "REORDER_VIEW_CATEGORIES");
        assert_eq!(json["team_id"], "t1");
        assert_eq!(json["payload"]["board_id"], "b1");
        assert_eq!(json["payload"]["category_order"][0], "c2");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn membership_event_wire_shape() {
        let event = ChangeEvent::new(
            "t1",
            ChangePayload::UpdateViewCategoryView {
                category_id: "c1".into(),
                view_id: "v1".into(),
                hidden: true,
            },
        );
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["action"], ACTION_UPDATE_VIEW_CATEGORY_VIEW);
        assert_eq!(json["payload"]["view_id"], "v1");
        assert_eq!(json["payload"]["hidden"], true);
    }

    #[test]
    fn category_event_carries_full_record() {
        let category = ViewCategory {
            id: "c1".into(),
            name: "Reports".into(),
            user_id: "u1".into(),
            board_id: "b1".into(),
            create_at: 1,
            update_at: 2,
            delete_at: 3,
            collapsed: false,
            sort_order: 0,
            category_type: "custom".into(),
        };
        let event = ChangeEvent::new("t1", ChangePayload::UpdateViewCategory(category));
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["action"], ACTION_UPDATE_VIEW_CATEGORY);
        assert_eq!(json["payload"]["id"], "c1");
        assert_eq!(json["payload"]["type"], "custom");
        assert_eq!(json["payload"]["delete_at"], 3);
    }

    #[test]
    fn action_names_match_serialized_tags() {
        let payloads = [
            ChangePayload::ReorderViewCategoryViews {
                category_id: "c1".into(),
                view_order: vec![],
            },
            ChangePayload::ReorderViewCategories {
                board_id: "b1".into(),
                category_order: vec![],
            },
        ];
        for payload in payloads {
            let json = serde_json::to_value(&payload).unwrap();
            assert_eq!(json["action"], payload.action());
        }
    }
}
