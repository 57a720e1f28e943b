//! Typed publishing helpers for categorization changes.
//!
//! [`ChangeNotifier`] is what the service layer calls after a mutation has
//! been committed. Publishing is fire-and-forget: it never blocks, never
//! retries, and a missing subscriber is not an error.

use std::sync::Arc;

use viewcat_core::types::EntityId;
use viewcat_db::models::view_category::ViewCategory;

use crate::bus::{ChangeEvent, ChangePayload, EventBus};

#[derive(Clone)]
pub struct ChangeNotifier {
    bus: Arc<EventBus>,
}

impl ChangeNotifier {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }

    /// A category was created, updated or tombstoned.
    pub fn category_changed(&self, team_id: &str, category: &ViewCategory) {
        self.publish(team_id, ChangePayload::UpdateViewCategory(category.clone()));
    }

    /// The category order of `board_id` is now `category_order`.
    pub fn categories_reordered(&self, team_id: &str, board_id: &str, category_order: &[EntityId]) {
        self.publish(
            team_id,
            ChangePayload::ReorderViewCategories {
                board_id: board_id.to_string(),
                category_order: category_order.to_vec(),
            },
        );
    }

    /// `view_id` is now in `category_id` with the given hidden flag.
    pub fn membership_changed(&self, team_id: &str, category_id: &str, view_id: &str, hidden: bool) {
        self.publish(
            team_id,
            ChangePayload::UpdateViewCategoryView {
                category_id: category_id.to_string(),
                view_id: view_id.to_string(),
                hidden,
            },
        );
    }

    /// The views of `category_id` are now ordered as `view_order`.
    pub fn views_reordered(&self, team_id: &str, category_id: &str, view_order: &[EntityId]) {
        self.publish(
            team_id,
            ChangePayload::ReorderViewCategoryViews {
                category_id: category_id.to_string(),
                view_order: view_order.to_vec(),
            },
        );
    }

    fn publish(&self, team_id: &str, change: ChangePayload) {
        tracing::debug!(team_id = %team_id, action = change.action(), "Publishing change event");
        self.bus.publish(ChangeEvent::new(team_id, change));
    }
}
