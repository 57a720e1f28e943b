//! Repository for the `view_categories` table.

use sqlx::{PgConnection, PgPool};
use viewcat_core::ordering::{plan_reorder, SORT_ORDER_GAP};
use viewcat_core::types::{EntityId, EpochMillis};

use crate::models::view_category::ViewCategory;

/// Column list for view_categories queries.
const COLUMNS: &str = "id, name, user_id, board_id, create_at, update_at, delete_at, \
    collapsed, sort_order, type";

/// Provides create/update/soft-delete/reorder operations for view categories.
pub struct ViewCategoryRepo;

impl ViewCategoryRepo {
    /// Find a category by id, including tombstoned rows.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<ViewCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM view_categories WHERE id = $1");
        sqlx::query_as::<_, ViewCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a category at the top of its board.
    ///
    /// The new row gets `sort_order = 0` and every other live category of the
    /// same board moves down by one gap, in one transaction.
    pub async fn create(pool: &PgPool, input: &ViewCategory) -> Result<ViewCategory, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO view_categories \
                (id, name, user_id, board_id, create_at, update_at, delete_at, \
                 collapsed, sort_order, type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, $9) \
             RETURNING {COLUMNS}"
        );
        let category = sqlx::query_as::<_, ViewCategory>(&insert_query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(&input.user_id)
            .bind(&input.board_id)
            .bind(input.create_at)
            .bind(input.update_at)
            .bind(input.delete_at)
            .bind(input.collapsed)
            .bind(&input.category_type)
            .fetch_one(&mut *tx)
            .await
            .inspect_err(|e| {
                tracing::error!(name = %input.name, error = %e, "Error creating view category");
            })?;

        sqlx::query(
            "UPDATE view_categories SET sort_order = sort_order + $1 \
             WHERE board_id = $2 AND delete_at = 0 AND id <> $3",
        )
        .bind(SORT_ORDER_GAP)
        .bind(&category.board_id)
        .bind(&category.id)
        .execute(&mut *tx)
        .await
        .inspect_err(|e| {
            tracing::error!(
                board_id = %category.board_id,
                error = %e,
                "Failed to bump sort order of sibling view categories",
            );
        })?;

        tx.commit().await?;
        Ok(category)
    }

    /// Update the mutable fields of a category: `name`, `collapsed`, `update_at`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        name: &str,
        collapsed: bool,
        update_at: EpochMillis,
    ) -> Result<Option<ViewCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE view_categories SET name = $2, collapsed = $3, update_at = $4 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ViewCategory>(&query)
            .bind(id)
            .bind(name)
            .bind(collapsed)
            .bind(update_at)
            .fetch_optional(pool)
            .await
            .inspect_err(|e| {
                tracing::error!(view_category_id = %id, error = %e, "Error updating view category");
            })
    }

    /// Tombstone a category. Only a row matching id, owner and board is
    /// touched; otherwise nothing happens.
    ///
    /// Returns `true` if a row was tombstoned.
    pub async fn soft_delete(
        pool: &PgPool,
        id: &str,
        user_id: &str,
        board_id: &str,
        delete_at: EpochMillis,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE view_categories SET delete_at = $4 \
             WHERE id = $1 AND user_id = $2 AND board_id = $3",
        )
        .bind(id)
        .bind(user_id)
        .bind(board_id)
        .bind(delete_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the live categories of a board in display order.
    pub async fn list_live(
        pool: &PgPool,
        board_id: &str,
    ) -> Result<Vec<ViewCategory>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::list_live_inner(&mut *conn, board_id).await
    }

    /// Apply a full client-submitted category order for a board.
    ///
    /// Returns the accepted order, or the stored order unchanged when the
    /// proposal does not have exactly one entry per live category.
    pub async fn reorder(
        pool: &PgPool,
        board_id: &str,
        proposed: &[EntityId],
    ) -> Result<Vec<EntityId>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Vec<EntityId> = Self::list_live_inner(&mut *tx, board_id)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        let plan = plan_reorder(&current, proposed);
        for assignment in plan.assignments() {
            sqlx::query("UPDATE view_categories SET sort_order = $2 WHERE id = $1")
                .bind(&assignment.id)
                .bind(assignment.sort_order)
                .execute(&mut *tx)
                .await
                .inspect_err(|e| {
                    tracing::error!(
                        view_category_id = %assignment.id,
                        error = %e,
                        "Failed to update view category order",
                    );
                })?;
        }

        tx.commit().await?;
        Ok(plan.into_order())
    }

    async fn list_live_inner(
        conn: &mut PgConnection,
        board_id: &str,
    ) -> Result<Vec<ViewCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM view_categories \
             WHERE board_id = $1 AND delete_at = 0 \
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, ViewCategory>(&query)
            .bind(board_id)
            .fetch_all(conn)
            .await
    }
}
