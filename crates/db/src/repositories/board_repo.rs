//! Read-only access to the `boards` and `board_members` tables.

use async_trait::async_trait;
use sqlx::PgPool;
use viewcat_core::board_access::{Board, BoardAccess};
use viewcat_core::error::CoreError;

/// Board lookups used for addressing change events and gating access.
pub struct BoardRepo;

impl BoardRepo {
    /// Find a board by id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Board>, sqlx::Error> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT id, team_id FROM boards WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(id, team_id)| Board { id, team_id }))
    }

    /// Whether `user_id` is a member of `board_id`.
    pub async fn is_member(pool: &PgPool, user_id: &str, board_id: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM board_members WHERE board_id = $1 AND user_id = $2)",
        )
        .bind(board_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }
}

/// [`BoardAccess`] backed by Postgres. Board membership grants view access.
#[derive(Clone)]
pub struct PgBoardAccess {
    pool: PgPool,
}

impl PgBoardAccess {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardAccess for PgBoardAccess {
    async fn find_board(&self, board_id: &str) -> Result<Option<Board>, CoreError> {
        BoardRepo::find_by_id(&self.pool, board_id)
            .await
            .map_err(|e| {
                tracing::error!(board_id = %board_id, error = %e, "Board lookup failed");
                CoreError::Internal(format!("board lookup failed: {e}"))
            })
    }

    async fn can_view_board(&self, user_id: &str, board_id: &str) -> Result<bool, CoreError> {
        BoardRepo::is_member(&self.pool, user_id, board_id)
            .await
            .map_err(|e| {
                tracing::error!(board_id = %board_id, error = %e, "Board permission check failed");
                CoreError::Internal(format!("board permission check failed: {e}"))
            })
    }
}
