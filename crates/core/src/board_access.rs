//! Board lookup and view-permission checks.
//!
//! Boards, their teams and their membership are owned elsewhere; this
//! service only needs to resolve a board's team (to address change events)
//! and to ask whether a user may view a board. [`BoardAccess`] is that
//! narrow seam. The storage crate provides the Postgres implementation and
//! [`InMemoryBoardAccess`] backs tests and local tooling.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::EntityId;

/// The slice of a board this service cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: EntityId,
    pub team_id: EntityId,
}

#[async_trait]
pub trait BoardAccess: Send + Sync + 'static {
    /// Look up a board by id. `None` if it does not exist.
    async fn find_board(&self, board_id: &str) -> Result<Option<Board>, CoreError>;

    /// Whether `user_id` holds view permission on `board_id`.
    async fn can_view_board(&self, user_id: &str, board_id: &str) -> Result<bool, CoreError>;
}

/// Map-backed [`BoardAccess`].
#[derive(Default)]
pub struct InMemoryBoardAccess {
    boards: RwLock<HashMap<EntityId, Board>>,
    viewers: RwLock<HashSet<(EntityId, EntityId)>>,
}

impl InMemoryBoardAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a board belonging to `team_id`.
    pub fn add_board(&self, board_id: &str, team_id: &str) {
        let board = Board {
            id: board_id.to_string(),
            team_id: team_id.to_string(),
        };
        if let Ok(mut boards) = self.boards.write() {
            boards.insert(board.id.clone(), board);
        }
    }

    /// Grant `user_id` view permission on `board_id`.
    pub fn grant_view(&self, user_id: &str, board_id: &str) {
        if let Ok(mut viewers) = self.viewers.write() {
            viewers.insert((board_id.to_string(), user_id.to_string()));
        }
    }
}

#[async_trait]
impl BoardAccess for InMemoryBoardAccess {
    async fn find_board(&self, board_id: &str) -> Result<Option<Board>, CoreError> {
        let boards = self
            .boards
            .read()
            .map_err(|_| CoreError::Internal("board map lock poisoned".into()))?;
        Ok(boards.get(board_id).cloned())
    }

    async fn can_view_board(&self, user_id: &str, board_id: &str) -> Result<bool, CoreError> {
        let viewers = self
            .viewers
            .read()
            .map_err(|_| CoreError::Internal("viewer set lock poisoned".into()))?;
        Ok(viewers.contains(&(board_id.to_string(), user_id.to_string())))
    }
}
