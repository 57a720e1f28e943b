//! Repository for the `view_category_views` table (view memberships).

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use viewcat_core::ordering::plan_reorder;
use viewcat_core::types::EntityId;

use crate::models::view_category::ViewCategoryWithViews;
use crate::models::view_category_view::ViewCategoryView;
use crate::repositories::ViewCategoryRepo;

/// Column list for view_category_views queries.
const COLUMNS: &str = "view_id, category_id, hidden, sort_order";

/// Provides membership upsert, ordering and visibility operations.
pub struct ViewCategoryViewRepo;

impl ViewCategoryViewRepo {
    /// Find the membership row of a view, if any.
    pub async fn find_by_view(
        pool: &PgPool,
        view_id: &str,
    ) -> Result<Option<ViewCategoryView>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM view_category_views WHERE view_id = $1");
        sqlx::query_as::<_, ViewCategoryView>(&query)
            .bind(view_id)
            .fetch_optional(pool)
            .await
    }

    /// List the members of one category in display order.
    pub async fn list_for_category(
        pool: &PgPool,
        category_id: &str,
    ) -> Result<Vec<ViewCategoryView>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::list_for_category_inner(&mut *conn, category_id).await
    }

    /// Every live category of a board, each with its members in display order.
    pub async fn list_with_views(
        pool: &PgPool,
        board_id: &str,
    ) -> Result<Vec<ViewCategoryWithViews>, sqlx::Error> {
        let categories = ViewCategoryRepo::list_live(pool, board_id).await?;
        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<EntityId> = categories.iter().map(|c| c.id.clone()).collect();
        let query = format!(
            "SELECT {COLUMNS} FROM view_category_views \
             WHERE category_id = ANY($1) \
             ORDER BY sort_order, view_id"
        );
        let rows = sqlx::query_as::<_, ViewCategoryView>(&query)
            .bind(&ids)
            .fetch_all(pool)
            .await
            .inspect_err(|e| {
                tracing::error!(board_id = %board_id, error = %e, "Error fetching view memberships");
            })?;

        let mut by_category: HashMap<EntityId, Vec<ViewCategoryView>> = HashMap::new();
        for row in rows {
            by_category.entry(row.category_id.clone()).or_default().push(row);
        }

        Ok(categories
            .into_iter()
            .map(|category| {
                let views = by_category.remove(&category.id).unwrap_or_default();
                ViewCategoryWithViews { category, views }
            })
            .collect())
    }

    /// Point each view at `category_id`.
    ///
    /// Views without a row get one with `hidden = false, sort_order = 0`.
    /// Views that already have a row only change category; their hidden flag
    /// and sort order carry over.
    pub async fn upsert(
        pool: &PgPool,
        category_id: &str,
        view_ids: &[EntityId],
    ) -> Result<Vec<ViewCategoryView>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut results = Vec::with_capacity(view_ids.len());

        let query = format!(
            "INSERT INTO view_category_views (view_id, category_id, hidden, sort_order) \
             VALUES ($1, $2, false, 0) \
             ON CONFLICT (view_id) \
             DO UPDATE SET category_id = EXCLUDED.category_id \
             RETURNING {COLUMNS}"
        );

        for view_id in view_ids {
            let row = sqlx::query_as::<_, ViewCategoryView>(&query)
                .bind(view_id)
                .bind(category_id)
                .fetch_one(&mut *tx)
                .await
                .inspect_err(|e| {
                    tracing::error!(
                        view_id = %view_id,
                        category_id = %category_id,
                        error = %e,
                        "Error upserting view membership",
                    );
                })?;
            results.push(row);
        }

        tx.commit().await?;
        Ok(results)
    }

    /// Apply a full client-submitted view order within a category.
    ///
    /// Returns the accepted order, or the stored order unchanged when the
    /// proposal does not have exactly one entry per member.
    pub async fn reorder(
        pool: &PgPool,
        category_id: &str,
        proposed: &[EntityId],
    ) -> Result<Vec<EntityId>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Vec<EntityId> = Self::list_for_category_inner(&mut *tx, category_id)
            .await?
            .into_iter()
            .map(|v| v.view_id)
            .collect();

        let plan = plan_reorder(&current, proposed);
        for assignment in plan.assignments() {
            sqlx::query(
                "UPDATE view_category_views SET sort_order = $3 \
                 WHERE view_id = $1 AND category_id = $2",
            )
            .bind(&assignment.id)
            .bind(category_id)
            .bind(assignment.sort_order)
            .execute(&mut *tx)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    view_id = %assignment.id,
                    error = %e,
                    "Failed to update view order",
                );
            })?;
        }

        tx.commit().await?;
        Ok(plan.into_order())
    }

    /// Set `hidden = !visible` on the membership of `view_id` in `category_id`.
    ///
    /// Returns `false` when the view is not a member of that category.
    pub async fn set_visibility(
        pool: &PgPool,
        category_id: &str,
        view_id: &str,
        visible: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE view_category_views SET hidden = $3 \
             WHERE view_id = $1 AND category_id = $2",
        )
        .bind(view_id)
        .bind(category_id)
        .bind(!visible)
        .execute(pool)
        .await
        .inspect_err(|e| {
            tracing::error!(view_id = %view_id, error = %e, "Error setting view visibility");
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_category_inner(
        conn: &mut PgConnection,
        category_id: &str,
    ) -> Result<Vec<ViewCategoryView>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM view_category_views \
             WHERE category_id = $1 \
             ORDER BY sort_order, view_id"
        );
        sqlx::query_as::<_, ViewCategoryView>(&query)
            .bind(category_id)
            .fetch_all(conn)
            .await
    }
}
