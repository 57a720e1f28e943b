//! View category model and DTOs.
//!
//! Categories are scoped to one board and shared by everyone who can view
//! it. `delete_at = 0` marks a live row; any other value is the tombstone
//! time in epoch milliseconds.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use viewcat_core::types::{EntityId, EpochMillis};

use super::view_category_view::ViewCategoryView;

/// A row from the `view_categories` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ViewCategory {
    pub id: EntityId,
    pub name: String,
    /// Owner of a custom category.
    pub user_id: EntityId,
    pub board_id: EntityId,
    pub create_at: EpochMillis,
    pub update_at: EpochMillis,
    pub delete_at: EpochMillis,
    /// Client-side collapsed state, persisted for the owner.
    pub collapsed: bool,
    pub sort_order: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub category_type: String,
}

impl ViewCategory {
    pub fn is_deleted(&self) -> bool {
        self.delete_at != 0
    }
}

/// A live category with its member views in display order.
#[derive(Debug, Clone, Serialize)]
pub struct ViewCategoryWithViews {
    #[serde(flatten)]
    pub category: ViewCategory,
    pub views: Vec<ViewCategoryView>,
}

/// DTO for creating a new view category.
///
/// The owner is always the acting user, so there is no `user_id` field.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateViewCategory {
    /// Optional client-chosen id; a fresh one is assigned when absent.
    pub id: Option<EntityId>,
    pub name: String,
    /// Must match the board in the request path when present.
    pub board_id: Option<EntityId>,
    #[serde(rename = "type")]
    pub category_type: String,
    pub collapsed: Option<bool>,
}

/// DTO for updating a view category. Only `name` and `collapsed` change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateViewCategory {
    /// Must match the category in the request path when present.
    pub id: Option<EntityId>,
    /// Must match the board in the request path when present.
    pub board_id: Option<EntityId>,
    pub name: String,
    pub collapsed: bool,
}
