//! Orchestration of view-category operations.
//!
//! [`CategorizationService`] validates input, resolves the board and the
//! caller's permission through [`BoardAccess`], enforces category
//! ownership, calls the repositories and finally publishes a change event.
//! Every check runs before the first write, so a rejected call has no side
//! effects.

use std::sync::Arc;

use viewcat_core::board_access::{Board, BoardAccess};
use viewcat_core::error::CoreError;
use viewcat_core::types::{new_id, now_millis, EntityId};
use viewcat_core::view_category::{
    is_uncategorized, validate_category, validate_category_name, validate_required_id,
    validate_view_ids, UNCATEGORIZED_CATEGORY_ID,
};
use viewcat_db::models::view_category::{
    CreateViewCategory, UpdateViewCategory, ViewCategory, ViewCategoryWithViews,
};
use viewcat_db::repositories::{ViewCategoryRepo, ViewCategoryViewRepo};
use viewcat_db::DbPool;
use viewcat_events::ChangeNotifier;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

#[derive(Clone)]
pub struct CategorizationService {
    pool: DbPool,
    boards: Arc<dyn BoardAccess>,
    notifier: ChangeNotifier,
}

impl CategorizationService {
    pub fn new(pool: DbPool, boards: Arc<dyn BoardAccess>, notifier: ChangeNotifier) -> Self {
        Self {
            pool,
            boards,
            notifier,
        }
    }

    // -----------------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------------

    /// Every live category of the board with its member views.
    pub async fn list_categories(
        &self,
        actor: &AuthUser,
        board_id: &str,
    ) -> AppResult<Vec<ViewCategoryWithViews>> {
        self.authorize_board(actor, board_id).await?;
        Ok(ViewCategoryViewRepo::list_with_views(&self.pool, board_id).await?)
    }

    /// Create a category owned by `actor` at the top of the board.
    pub async fn create_category(
        &self,
        actor: &AuthUser,
        board_id: &str,
        input: CreateViewCategory,
    ) -> AppResult<ViewCategory> {
        ensure_path_match("board_id", board_id, input.board_id.as_deref())?;

        let id = match input.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => new_id(),
        };
        let name = input.name.trim().to_string();
        validate_category(&id, &name, &actor.user_id, board_id, &input.category_type)
            .map_err(CoreError::Validation)?;

        let board = self.authorize_board(actor, board_id).await?;

        let now = now_millis();
        let category = ViewCategory {
            id,
            name,
            user_id: actor.user_id.clone(),
            board_id: board_id.to_string(),
            create_at: now,
            update_at: now,
            delete_at: 0,
            collapsed: input.collapsed.unwrap_or(false),
            sort_order: 0,
            category_type: input.category_type,
        };
        let created = ViewCategoryRepo::create(&self.pool, &category).await?;

        tracing::info!(
            view_category_id = %created.id,
            board_id = %board_id,
            user_id = %actor.user_id,
            "View category created",
        );
        self.notifier.category_changed(&board.team_id, &created);
        Ok(created)
    }

    /// Rename and/or collapse a category the caller owns.
    pub async fn update_category(
        &self,
        actor: &AuthUser,
        board_id: &str,
        category_id: &str,
        input: UpdateViewCategory,
    ) -> AppResult<ViewCategory> {
        ensure_path_match("board_id", board_id, input.board_id.as_deref())?;
        ensure_path_match("id", category_id, input.id.as_deref())?;
        let name = input.name.trim();
        validate_category_name(name).map_err(CoreError::Validation)?;

        let board = self.authorize_board(actor, board_id).await?;
        self.owned_category(actor, board_id, category_id).await?;

        let updated = ViewCategoryRepo::update(
            &self.pool,
            category_id,
            name,
            input.collapsed,
            now_millis(),
        )
        .await?
        .ok_or_else(|| category_not_found(category_id))?;

        tracing::info!(
            view_category_id = %category_id,
            user_id = %actor.user_id,
            "View category updated",
        );
        self.notifier.category_changed(&board.team_id, &updated);
        Ok(updated)
    }

    /// Tombstone a category the caller owns.
    ///
    /// Returns the category as it was, with `delete_at` set. Memberships
    /// that point at it are left untouched.
    pub async fn delete_category(
        &self,
        actor: &AuthUser,
        board_id: &str,
        category_id: &str,
    ) -> AppResult<ViewCategory> {
        let board = self.authorize_board(actor, board_id).await?;
        let mut category = self.owned_category(actor, board_id, category_id).await?;

        let delete_at = now_millis();
        let deleted = ViewCategoryRepo::soft_delete(
            &self.pool,
            category_id,
            &actor.user_id,
            board_id,
            delete_at,
        )
        .await?;
        if !deleted {
            return Err(category_not_found(category_id));
        }
        category.delete_at = delete_at;

        tracing::info!(
            view_category_id = %category_id,
            user_id = %actor.user_id,
            "View category deleted",
        );
        self.notifier.category_changed(&board.team_id, &category);
        Ok(category)
    }

    /// Apply a full category order for the board.
    ///
    /// A proposal that does not cover every live category leaves the board
    /// untouched and returns the stored order.
    pub async fn reorder_categories(
        &self,
        actor: &AuthUser,
        board_id: &str,
        proposed: Vec<EntityId>,
    ) -> AppResult<Vec<EntityId>> {
        let board = self.authorize_board(actor, board_id).await?;

        let order = ViewCategoryRepo::reorder(&self.pool, board_id, &proposed).await?;

        tracing::info!(
            board_id = %board_id,
            user_id = %actor.user_id,
            count = order.len(),
            "View categories reordered",
        );
        self.notifier
            .categories_reordered(&board.team_id, board_id, &order);
        Ok(order)
    }

    // -----------------------------------------------------------------------
    // Memberships
    // -----------------------------------------------------------------------

    /// Move views into a category, or into the uncategorized bucket when
    /// `category_id` is the sentinel.
    ///
    /// Emits one membership event per view.
    pub async fn categorize(
        &self,
        actor: &AuthUser,
        board_id: &str,
        category_id: &str,
        view_ids: Vec<EntityId>,
    ) -> AppResult<()> {
        validate_view_ids(&view_ids).map_err(CoreError::Validation)?;

        let board = self.authorize_board(actor, board_id).await?;
        if !is_uncategorized(category_id) {
            self.owned_category(actor, board_id, category_id).await?;
        }

        let rows = ViewCategoryViewRepo::upsert(&self.pool, category_id, &view_ids).await?;

        tracing::info!(
            view_category_id = %category_id,
            user_id = %actor.user_id,
            count = rows.len(),
            "Views categorized",
        );
        for row in &rows {
            self.notifier
                .membership_changed(&board.team_id, &row.category_id, &row.view_id, row.hidden);
        }
        Ok(())
    }

    /// Move a view into the uncategorized bucket.
    ///
    /// Unlike [`categorize`](Self::categorize) this publishes no event.
    pub async fn uncategorize(
        &self,
        actor: &AuthUser,
        board_id: &str,
        view_id: &str,
    ) -> AppResult<()> {
        validate_required_id("view id", view_id).map_err(CoreError::Validation)?;

        self.authorize_board(actor, board_id).await?;

        ViewCategoryViewRepo::upsert(
            &self.pool,
            UNCATEGORIZED_CATEGORY_ID,
            &[view_id.to_string()],
        )
        .await?;

        tracing::info!(view_id = %view_id, user_id = %actor.user_id, "View uncategorized");
        Ok(())
    }

    /// Apply a full view order inside a category the caller owns.
    pub async fn reorder_views(
        &self,
        actor: &AuthUser,
        board_id: &str,
        category_id: &str,
        proposed: Vec<EntityId>,
    ) -> AppResult<Vec<EntityId>> {
        let board = self.authorize_board(actor, board_id).await?;
        self.owned_category(actor, board_id, category_id).await?;

        let order = ViewCategoryViewRepo::reorder(&self.pool, category_id, &proposed).await?;

        tracing::info!(
            view_category_id = %category_id,
            user_id = %actor.user_id,
            count = order.len(),
            "Views reordered",
        );
        self.notifier
            .views_reordered(&board.team_id, category_id, &order);
        Ok(order)
    }

    /// Hide (`visible = false`) or show a view inside a category the caller
    /// owns. A view that is not a member is left alone without error.
    pub async fn set_view_visibility(
        &self,
        actor: &AuthUser,
        board_id: &str,
        category_id: &str,
        view_id: &str,
        visible: bool,
    ) -> AppResult<()> {
        validate_required_id("view id", view_id).map_err(CoreError::Validation)?;

        let board = self.authorize_board(actor, board_id).await?;
        self.owned_category(actor, board_id, category_id).await?;

        let changed =
            ViewCategoryViewRepo::set_visibility(&self.pool, category_id, view_id, visible).await?;

        tracing::info!(
            view_category_id = %category_id,
            view_id = %view_id,
            visible,
            changed,
            "View visibility set",
        );
        self.notifier
            .membership_changed(&board.team_id, category_id, view_id, !visible);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Checks
    // -----------------------------------------------------------------------

    /// Resolve the board and require view permission on it.
    async fn authorize_board(&self, actor: &AuthUser, board_id: &str) -> AppResult<Board> {
        let board = self
            .boards
            .find_board(board_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::NotFound {
                    entity: "Board",
                    id: board_id.to_string(),
                })
            })?;

        if !self.boards.can_view_board(&actor.user_id, board_id).await? {
            return Err(AppError::Core(CoreError::Forbidden(
                "access denied to board".to_string(),
            )));
        }
        Ok(board)
    }

    /// Fetch a live category of `board_id` and require that `actor` owns it.
    async fn owned_category(
        &self,
        actor: &AuthUser,
        board_id: &str,
        category_id: &str,
    ) -> AppResult<ViewCategory> {
        let category = ViewCategoryRepo::find_by_id(&self.pool, category_id)
            .await?
            .filter(|c| !c.is_deleted() && c.board_id == board_id)
            .ok_or_else(|| category_not_found(category_id))?;

        if category.user_id != actor.user_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "access denied to view category".to_string(),
            )));
        }
        Ok(category)
    }
}

fn category_not_found(category_id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ViewCategory",
        id: category_id.to_string(),
    })
}

/// A body field that repeats a path parameter must agree with it.
fn ensure_path_match(field: &str, path_value: &str, body_value: Option<&str>) -> AppResult<()> {
    match body_value {
        Some(value) if value != path_value => Err(AppError::BadRequest(format!(
            "{field} in body does not match path"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn path_match_accepts_absent_or_equal() {
        assert!(ensure_path_match("board_id", "b1", None).is_ok());
        assert!(ensure_path_match("board_id", "b1", Some("b1")).is_ok());
    }

    #[test]
    fn path_match_rejects_mismatch() {
        assert_matches!(
            ensure_path_match("id", "c1", Some("c2")),
            Err(AppError::BadRequest(msg)) if msg == "id in body does not match path"
        );
    }
}
