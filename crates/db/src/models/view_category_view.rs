//! View-to-category membership model.
//!
//! Each view has at most one row, keyed by `view_id`. A view without a row,
//! or whose row carries the empty category id, is uncategorized.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use viewcat_core::types::EntityId;

/// A row from the `view_category_views` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ViewCategoryView {
    pub view_id: EntityId,
    pub category_id: EntityId,
    pub hidden: bool,
    pub sort_order: i32,
}
