pub mod health;
pub mod view_categories;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                                              WebSocket (?token=)
///
/// /boards/{board_id}/view-categories                               list, create
/// /boards/{board_id}/view-categories/reorder                       reorder categories (PUT)
/// /boards/{board_id}/view-categories/{category_id}                 update, delete
/// /boards/{board_id}/view-categories/{category_id}/views/reorder   reorder views (PUT)
/// /boards/{board_id}/view-categories/{category_id}/views/{view_id} categorize (POST)
///     .../hide, .../unhide                                         visibility (PUT)
/// /boards/{board_id}/views/{view_id}/uncategorize                  uncategorize (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint.
        .route("/ws", get(ws::ws_handler))
        // View categories and memberships.
        .merge(view_categories::router())
}
