//! Route definitions for view categories and view memberships.
//!
//! All endpoints require authentication.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::view_categories;
use crate::state::AppState;

/// Routes mounted under `/api/v1`.
///
/// ```text
/// GET    /boards/{board_id}/view-categories                          -> list_view_categories
/// POST   /boards/{board_id}/view-categories                          -> create_view_category
/// PUT    /boards/{board_id}/view-categories/reorder                  -> reorder_view_categories
/// PUT    /boards/{board_id}/view-categories/{category_id}            -> update_view_category
/// DELETE /boards/{board_id}/view-categories/{category_id}            -> delete_view_category
/// PUT    .../{category_id}/views/reorder                             -> reorder_category_views
/// POST   .../{category_id}/views/{view_id}                           -> categorize_view
/// PUT    .../{category_id}/views/{view_id}/hide                      -> hide_view
/// PUT    .../{category_id}/views/{view_id}/unhide                    -> unhide_view
/// POST   /boards/{board_id}/views/{view_id}/uncategorize             -> uncategorize_view
/// ```
pub fn router() -> Router<AppState> {
    let base = "/boards/{board_id}/view-categories";
    Router::new()
        .route(
            base,
            get(view_categories::list_view_categories)
                .post(view_categories::create_view_category),
        )
        .route(
            &format!("{base}/reorder"),
            put(view_categories::reorder_view_categories),
        )
        .route(
            &format!("{base}/{{category_id}}"),
            put(view_categories::update_view_category)
                .delete(view_categories::delete_view_category),
        )
        .route(
            &format!("{base}/{{category_id}}/views/reorder"),
            put(view_categories::reorder_category_views),
        )
        .route(
            &format!("{base}/{{category_id}}/views/{{view_id}}"),
            post(view_categories::categorize_view),
        )
        .route(
            &format!("{base}/{{category_id}}/views/{{view_id}}/hide"),
            put(view_categories::hide_view),
        )
        .route(
            &format!("{base}/{{category_id}}/views/{{view_id}}/unhide"),
            put(view_categories::unhide_view),
        )
        .route(
            "/boards/{board_id}/views/{view_id}/uncategorize",
            post(view_categories::uncategorize_view),
        )
}
