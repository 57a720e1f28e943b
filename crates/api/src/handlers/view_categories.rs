//! Handlers for `/boards/{board_id}/view-categories` and view memberships.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use viewcat_core::types::EntityId;
use viewcat_db::models::view_category::{CreateViewCategory, UpdateViewCategory};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /api/v1/boards/{board_id}/view-categories
///
/// Live categories of the board, each with its views in display order.
pub async fn list_view_categories(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    let categories = state.categories.list_categories(&auth, &board_id).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/boards/{board_id}/view-categories
///
/// Create a category owned by the caller. Returns 201.
pub async fn create_view_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<EntityId>,
    Json(input): Json<CreateViewCategory>,
) -> AppResult<impl IntoResponse> {
    let category = state
        .categories
        .create_category(&auth, &board_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/boards/{board_id}/view-categories/{category_id}
pub async fn update_view_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((board_id, category_id)): Path<(EntityId, EntityId)>,
    Json(input): Json<UpdateViewCategory>,
) -> AppResult<impl IntoResponse> {
    let category = state
        .categories
        .update_category(&auth, &board_id, &category_id, input)
        .await?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/boards/{board_id}/view-categories/{category_id}
///
/// Returns the tombstoned category.
pub async fn delete_view_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((board_id, category_id)): Path<(EntityId, EntityId)>,
) -> AppResult<impl IntoResponse> {
    let category = state
        .categories
        .delete_category(&auth, &board_id, &category_id)
        .await?;
    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/v1/boards/{board_id}/view-categories/reorder
///
/// Body is the full list of category ids in the new order.
pub async fn reorder_view_categories(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<EntityId>,
    Json(order): Json<Vec<EntityId>>,
) -> AppResult<impl IntoResponse> {
    let order = state
        .categories
        .reorder_categories(&auth, &board_id, order)
        .await?;
    Ok(Json(DataResponse { data: order }))
}

// ---------------------------------------------------------------------------
// Memberships
// ---------------------------------------------------------------------------

/// PUT /api/v1/boards/{board_id}/view-categories/{category_id}/views/reorder
pub async fn reorder_category_views(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((board_id, category_id)): Path<(EntityId, EntityId)>,
    Json(order): Json<Vec<EntityId>>,
) -> AppResult<impl IntoResponse> {
    let order = state
        .categories
        .reorder_views(&auth, &board_id, &category_id, order)
        .await?;
    Ok(Json(DataResponse { data: order }))
}

/// POST /api/v1/boards/{board_id}/view-categories/{category_id}/views/{view_id}
///
/// Move the view into the category. Returns 204.
pub async fn categorize_view(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((board_id, category_id, view_id)): Path<(EntityId, EntityId, EntityId)>,
) -> AppResult<impl IntoResponse> {
    state
        .categories
        .categorize(&auth, &board_id, &category_id, vec![view_id])
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/boards/{board_id}/view-categories/{category_id}/views/{view_id}/hide
pub async fn hide_view(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((board_id, category_id, view_id)): Path<(EntityId, EntityId, EntityId)>,
) -> AppResult<impl IntoResponse> {
    state
        .categories
        .set_view_visibility(&auth, &board_id, &category_id, &view_id, false)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/boards/{board_id}/view-categories/{category_id}/views/{view_id}/unhide
pub async fn unhide_view(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((board_id, category_id, view_id)): Path<(EntityId, EntityId, EntityId)>,
) -> AppResult<impl IntoResponse> {
    state
        .categories
        .set_view_visibility(&auth, &board_id, &category_id, &view_id, true)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/boards/{board_id}/views/{view_id}/uncategorize
pub async fn uncategorize_view(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((board_id, view_id)): Path<(EntityId, EntityId)>,
) -> AppResult<impl IntoResponse> {
    state
        .categories
        .uncategorize(&auth, &board_id, &view_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
